//! Read model of open and closed positions, refreshed on demand from
//! `GET /api/trades`. The backend owns the trades; this is a display cache.

use crate::format;
use crate::wire::{Trade, TradeStatus, TradesResponse};

/// Closed trades shown in the UI: the most recent 20, newest first.
pub const CLOSED_DISPLAY_LIMIT: usize = 20;

#[derive(Debug, Default)]
pub struct TradeLedger {
    open: Vec<Trade>,
    closed: Vec<Trade>,
    loaded: bool,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both cached lists wholesale with a fresh server response.
    pub fn apply(&mut self, response: TradesResponse) {
        self.open = response.open;
        self.closed = response.closed;
        self.loaded = true;
    }

    /// Open trades in server-delivered order.
    pub fn open(&self) -> &[Trade] {
        &self.open
    }

    /// The last [`CLOSED_DISPLAY_LIMIT`] closed trades by delivered order,
    /// reversed so the newest renders first. Never "oldest 20".
    pub fn closed_display(&self) -> Vec<&Trade> {
        let start = self.closed.len().saturating_sub(CLOSED_DISPLAY_LIMIT);
        self.closed[start..].iter().rev().collect()
    }

    pub fn closed_total(&self) -> usize {
        self.closed.len()
    }

    /// Whether at least one refresh has completed (distinguishes "no trades"
    /// from "not loaded yet" in the empty-state text).
    pub fn loaded(&self) -> bool {
        self.loaded
    }
}

/// P/L line for a closed trade, taken verbatim from the delivered fields.
/// Open trades have no P/L line; nothing is recomputed from entry/exit.
pub fn pnl_line(trade: &Trade) -> Option<String> {
    if trade.status != TradeStatus::Closed {
        return None;
    }
    let pnl = trade.pnl.unwrap_or(0.0);
    let pct = trade.pnl_percent.unwrap_or(0.0);
    Some(format!(
        "P/L: {} ({})",
        format::fmt_money(pnl),
        format::fmt_signed_percent(pct)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::TradeSide;

    fn closed_trade(n: usize) -> Trade {
        Trade {
            symbol: format!("C{n}/USDT"),
            side: TradeSide::Buy,
            entry_price: 100.0,
            quantity: 1.0,
            exit_price: Some(110.0),
            entry_time: String::new(),
            status: TradeStatus::Closed,
            pnl: Some(10.0),
            pnl_percent: Some(10.0),
        }
    }

    fn open_trade(sym: &str) -> Trade {
        Trade {
            symbol: sym.to_string(),
            side: TradeSide::Buy,
            entry_price: 100.0,
            quantity: 1.0,
            exit_price: None,
            entry_time: String::new(),
            status: TradeStatus::Open,
            pnl: None,
            pnl_percent: None,
        }
    }

    #[test]
    fn closed_shows_most_recent_twenty_newest_first() {
        let mut ledger = TradeLedger::new();
        ledger.apply(TradesResponse {
            open: vec![],
            closed: (0..30).map(closed_trade).collect(),
        });
        let shown = ledger.closed_display();
        assert_eq!(shown.len(), CLOSED_DISPLAY_LIMIT);
        assert_eq!(shown[0].symbol, "C29/USDT");
        assert_eq!(shown[CLOSED_DISPLAY_LIMIT - 1].symbol, "C10/USDT");
    }

    #[test]
    fn fewer_than_twenty_renders_all_reversed() {
        let mut ledger = TradeLedger::new();
        ledger.apply(TradesResponse {
            open: vec![],
            closed: (0..3).map(closed_trade).collect(),
        });
        let shown = ledger.closed_display();
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[0].symbol, "C2/USDT");
        assert_eq!(shown[2].symbol, "C0/USDT");
    }

    #[test]
    fn open_trades_keep_server_order() {
        let mut ledger = TradeLedger::new();
        ledger.apply(TradesResponse {
            open: vec![open_trade("BTC/USDT"), open_trade("ETH/USDT")],
            closed: vec![],
        });
        assert_eq!(ledger.open()[0].symbol, "BTC/USDT");
        assert_eq!(ledger.open()[1].symbol, "ETH/USDT");
    }

    #[test]
    fn pnl_line_only_for_closed() {
        assert!(pnl_line(&open_trade("BTC/USDT")).is_none());
        let line = pnl_line(&closed_trade(0)).unwrap();
        assert_eq!(line, "P/L: $10.00 (+10.00%)");
    }
}
