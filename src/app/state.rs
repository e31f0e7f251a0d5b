use std::time::{SystemTime, UNIX_EPOCH};

use crate::chart::ChartSession;
use crate::ledger::TradeLedger;
use crate::logbuf::LogBuffer;
use crate::triggers::TriggerEditor;
use crate::watchlist::Watchlist;
use crate::wire::{CoinPriceRow, MarketCoin};

use super::commands::Command;

/// The whole client-side view state. Owned by the runtime task; every
/// mutation goes through the reducer, every component slice is mutated only
/// through that component's methods.
#[derive(Debug)]
pub struct AppState {
    // Connectivity + last-applied snapshot fields (replaced wholesale).
    pub connected: bool,
    pub running: bool,
    pub paper_mode: bool,
    pub balance: f64,
    pub total_pnl: f64,
    pub open_position_count: u32,
    pub prices: Vec<CoinPriceRow>,
    pub last_update: Option<String>,
    /// Freshness token of the rendered snapshot, unix seconds. Poll results
    /// older than this are dropped at the reconciliation boundary.
    pub last_update_unix: Option<i64>,

    pub market: Vec<MarketCoin>,

    // Component slices, each its own single writer.
    pub watchlist: Watchlist,
    pub triggers: TriggerEditor,
    pub ledger: TradeLedger,
    pub chart: ChartSession,
    pub log: LogBuffer,

    /// Blocking alert text (wallet rejections, validation failures). One at
    /// a time; dismissed explicitly.
    pub alert: Option<String>,
    pub current_time: String,

    seq: u64,
    // Latest issued sequence per response slot; anything older is stale.
    pub(super) status_seq: u64,
    pub(super) trades_seq: u64,
    pub(super) market_seq: u64,

    pending: Vec<Command>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            connected: false,
            running: false,
            paper_mode: true,
            balance: 0.0,
            total_pnl: 0.0,
            open_position_count: 0,
            prices: Vec::new(),
            last_update: None,
            last_update_unix: None,
            market: Vec::new(),
            watchlist: Watchlist::new(),
            triggers: TriggerEditor::new(),
            ledger: TradeLedger::new(),
            chart: ChartSession::new(),
            log: LogBuffer::new(),
            alert: None,
            current_time: String::new(),
            seq: 0,
            status_seq: 0,
            trades_seq: 0,
            market_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic sequence for tagging outgoing requests.
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub(super) fn queue(&mut self, cmd: Command) {
        self.pending.push(cmd);
    }

    /// Drains the side effects queued by the last reduce step.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// unix seconds
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// RFC 3339 -> unix seconds; malformed or absent timestamps yield None and
/// never block a snapshot from applying.
pub fn parse_update_ts(ts: &Option<String>) -> Option<i64> {
    ts.as_deref()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_strictly_increasing() {
        let mut state = AppState::new();
        let a = state.next_seq();
        let b = state.next_seq();
        assert!(b > a);
    }

    #[test]
    fn update_ts_parses_rfc3339() {
        let ts = Some("2026-01-02T03:04:05+00:00".to_string());
        assert_eq!(parse_update_ts(&ts), Some(1767323045));
        assert_eq!(parse_update_ts(&Some("not a date".into())), None);
        assert_eq!(parse_update_ts(&None), None);
    }
}
