//! Insertion-ordered set of tracked instrument symbols. Purely client-side:
//! membership is a display filter, not persisted, and resets to the default
//! set on restart (known limitation).

pub const DEFAULT_COINS: &[&str] = &[
    "BTC/USDT",
    "ETH/USDT",
    "SOL/USDT",
    "XRP/USDT",
    "DOGE/USDT",
    "ADA/USDT",
    "AVAX/USDT",
    "MATIC/USDT",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
    Malformed,
}

#[derive(Debug, Clone)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_COINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self { symbols: Vec::new() }
    }

    /// Uppercases, validates `BASE/QUOTE`, then inserts at the end. A symbol
    /// already present is rejected without touching order or count.
    pub fn add(&mut self, raw: &str) -> AddOutcome {
        let symbol = raw.trim().to_ascii_uppercase();
        if !is_valid_pair(&symbol) {
            return AddOutcome::Malformed;
        }
        if self.symbols.iter().any(|s| s == &symbol) {
            return AddOutcome::Duplicate;
        }
        self.symbols.push(symbol);
        AddOutcome::Added
    }

    /// Idempotent; removing an absent symbol is a no-op and survivors keep
    /// their order.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let target = symbol.trim().to_ascii_uppercase();
        let before = self.symbols.len();
        self.symbols.retain(|s| s != &target);
        before != self.symbols.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn is_valid_pair(symbol: &str) -> bool {
    let mut parts = symbol.split('/');
    let (Some(base), Some(quote), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !base.is_empty() && !quote.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_defaults_in_order() {
        let wl = Watchlist::new();
        let listed: Vec<&str> = wl.iter().collect();
        assert_eq!(listed, DEFAULT_COINS);
    }

    #[test]
    fn add_normalizes_case() {
        let mut wl = Watchlist::empty();
        assert_eq!(wl.add("link/usdt"), AddOutcome::Added);
        assert!(wl.contains("LINK/USDT"));
    }

    #[test]
    fn add_rejects_missing_separator() {
        let mut wl = Watchlist::empty();
        assert_eq!(wl.add("LINKUSDT"), AddOutcome::Malformed);
        assert_eq!(wl.add("LINK/"), AddOutcome::Malformed);
        assert_eq!(wl.add("/USDT"), AddOutcome::Malformed);
        assert_eq!(wl.add("A/B/C"), AddOutcome::Malformed);
        assert!(wl.is_empty());
    }

    #[test]
    fn duplicate_add_is_idempotent() {
        let mut wl = Watchlist::new();
        let before: Vec<String> = wl.iter().map(String::from).collect();
        assert_eq!(wl.add("btc/usdt"), AddOutcome::Duplicate);
        let after: Vec<String> = wl.iter().map(String::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_keeps_order_and_is_idempotent() {
        let mut wl = Watchlist::new();
        assert!(wl.remove("ETH/USDT"));
        assert!(!wl.remove("ETH/USDT"));
        let listed: Vec<&str> = wl.iter().collect();
        assert_eq!(listed[0], "BTC/USDT");
        assert_eq!(listed[1], "SOL/USDT");
        assert_eq!(listed.len(), DEFAULT_COINS.len() - 1);
    }
}
