use serde::{Deserialize, Serialize};

/// One full dashboard snapshot as delivered by the backend, either over the
/// push channel (`update` frame) or as a polled refresh. The client never
/// mutates a snapshot; each new one replaces the previous wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub total_pnl: f64,
    #[serde(default)]
    pub open_position_count: u32,
    #[serde(default)]
    pub running: bool,
    #[serde(default = "default_true")]
    pub paper_mode: bool,
    #[serde(default)]
    pub prices: Vec<CoinPriceRow>,
    /// RFC 3339 timestamp; parsed lazily for freshness comparison.
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinPriceRow {
    pub symbol: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change_24h: f64,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub dip_percent: f64,
    #[serde(default)]
    pub volume_spike: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// Read-only cached copy of a backend-owned trade. `pnl`/`pnl_percent` are
/// present iff the trade is closed; the client never recomputes them.
#[derive(Debug, Clone, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: TradeSide,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub entry_time: String,
    pub status: TradeStatus,
    #[serde(default)]
    pub pnl: Option<f64>,
    #[serde(default)]
    pub pnl_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub open: Vec<Trade>,
    #[serde(default)]
    pub closed: Vec<Trade>,
}

/// Trigger thresholds on the wire. Every field is optional so a partial
/// server config still loads; the editor substitutes defaults per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerConfigWire {
    #[serde(default)]
    pub buy: BuyTriggersWire,
    #[serde(default)]
    pub sell: SellTriggersWire,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuyTriggersWire {
    #[serde(default)]
    pub rsi_below: Option<f64>,
    #[serde(default)]
    pub dip_percent: Option<f64>,
    #[serde(default)]
    pub volume_spike: Option<f64>,
    #[serde(default)]
    pub require_all: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellTriggersWire {
    #[serde(default)]
    pub rsi_above: Option<f64>,
    #[serde(default)]
    pub rise_percent: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub running: bool,
    #[serde(default = "default_true")]
    pub paper_mode: bool,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub total_pnl: Option<f64>,
    #[serde(default)]
    pub triggers: Option<TriggerConfigWire>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// Indicator summary for the focused chart symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub high_24h: f64,
    #[serde(default)]
    pub low_24h: f64,
    #[serde(default)]
    pub dip_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change_24h: f64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub paper_mode: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Frames arriving on the push channel. Connect/disconnect are transport
/// lifecycle, not frames, so only data frames appear here.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushFrame {
    Update(DashboardSnapshot),
    Trade {
        symbol: String,
        signal: TradeSide,
        price: f64,
        #[serde(default)]
        reasons: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tolerates_missing_optionals() {
        let snap: DashboardSnapshot = serde_json::from_str(
            r#"{"balance": 950.0, "prices": [{"symbol": "BTC/USDT", "price": 65000.0}]}"#,
        )
        .unwrap();
        assert!(snap.paper_mode);
        assert!(!snap.running);
        assert_eq!(snap.prices.len(), 1);
        assert!(snap.prices[0].rsi.is_none());
        assert_eq!(snap.prices[0].dip_percent, 0.0);
    }

    #[test]
    fn push_frame_update_is_tagged() {
        let frame: PushFrame = serde_json::from_str(
            r#"{"type": "update", "balance": 100.0, "running": true, "paper_mode": true,
                "prices": [], "total_pnl": 0.0, "last_update": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        match frame {
            PushFrame::Update(s) => {
                assert!(s.running);
                assert_eq!(s.last_update.as_deref(), Some("2026-01-01T00:00:00Z"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn push_frame_trade_defaults_reasons() {
        let frame: PushFrame = serde_json::from_str(
            r#"{"type": "trade", "symbol": "ETH/USDT", "signal": "sell", "price": 3000.0}"#,
        )
        .unwrap();
        match frame {
            PushFrame::Trade { signal, reasons, .. } => {
                assert_eq!(signal, TradeSide::Sell);
                assert!(reasons.is_empty());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn partial_trigger_config_loads() {
        let cfg: TriggerConfigWire =
            serde_json::from_str(r#"{"buy": {"rsi_below": 25.0}}"#).unwrap();
        assert_eq!(cfg.buy.rsi_below, Some(25.0));
        assert!(cfg.buy.dip_percent.is_none());
        assert!(cfg.sell.rsi_above.is_none());
    }
}
