//! Pure projection of [`AppState`] into a flat, string-typed view model.
//! Rendering derives everything on the fly; nothing here writes back into
//! the state, so the same state always yields the same model.

use crate::format;
use crate::ledger;
use crate::triggers::TriggerEditor;
use crate::wire::{MarketCoin, Trade};

use super::state::AppState;

/// Render-time trade signal for one price row. Recomputed from the row's
/// indicator fields on every render, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// BUY when RSI is oversold (< 30) or the dip exceeds 5%; otherwise SELL
    /// when RSI is overbought (> 70); otherwise HOLD. With RSI absent only
    /// the dip condition can produce BUY.
    pub fn classify(rsi: Option<f64>, dip_percent: f64) -> Self {
        let oversold = matches!(rsi, Some(v) if v < 30.0);
        let overbought = matches!(rsi, Some(v) if v > 70.0);
        if oversold || dip_percent > 5.0 {
            Signal::Buy
        } else if overbought {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        }
    }
}

/// RSI badge class: "oversold" below 30, "overbought" above 70, otherwise
/// "neutral" (absent RSI included).
pub fn rsi_class(rsi: Option<f64>) -> &'static str {
    match rsi {
        Some(v) if v < 30.0 => "oversold",
        Some(v) if v > 70.0 => "overbought",
        _ => "neutral",
    }
}

fn change_class(change: f64) -> &'static str {
    if change < 0.0 {
        "down"
    } else {
        "up"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRowView {
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub change_class: &'static str,
    pub rsi: String,
    pub rsi_class: &'static str,
    pub dip: String,
    pub spike: String,
    pub signal: &'static str,
    pub signal_class: &'static str,
    pub selected: bool,
    pub watched: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketRowView {
    pub rank: String,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub change_class: &'static str,
    pub market_cap: String,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeLineView {
    pub summary: String,
    pub pnl_line: String,
    pub pnl_class: &'static str,
}

/// One slider/input pair of the trigger form. Both controls always show the
/// same canonical value.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPairView {
    pub label: &'static str,
    pub slider: f64,
    pub input: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerFormView {
    pub pairs: Vec<TriggerPairView>,
    pub buy_require_all: bool,
    pub buy_enabled: bool,
    pub sell_enabled: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub symbol: String,
    pub timeframe: String,
    pub rsi: String,
    pub rsi_class: &'static str,
    pub high_24h: String,
    pub low_24h: String,
    pub dip: String,
    pub overlay_x: f64,
    pub overlay_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLineView {
    pub ts: String,
    pub message: String,
    pub class: &'static str,
}

/// Everything the presentation layer needs, fully formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub connection_text: &'static str,
    pub connection_class: &'static str,
    pub running_text: &'static str,
    pub running_class: &'static str,
    pub mode_text: &'static str,
    pub mode_class: &'static str,

    pub balance_text: String,
    pub pnl_text: String,
    pub pnl_class: &'static str,
    pub open_position_text: String,
    pub last_update_text: String,
    pub clock_text: String,

    pub price_rows: Vec<PriceRowView>,
    pub market_rows: Vec<MarketRowView>,

    pub open_trades: Vec<TradeLineView>,
    pub open_trades_empty: Option<&'static str>,
    pub closed_trades: Vec<TradeLineView>,
    pub closed_trades_empty: Option<&'static str>,
    pub closed_total_text: String,

    pub triggers: TriggerFormView,
    pub chart: Option<ChartView>,
    pub log_lines: Vec<LogLineView>,
    pub alert: Option<String>,
}

pub fn render(state: &AppState) -> RenderModel {
    let selected = state.chart.focused_symbol();

    let price_rows = state
        .prices
        .iter()
        .map(|row| {
            let signal = Signal::classify(row.rsi, row.dip_percent);
            PriceRowView {
                symbol: row.symbol.clone(),
                price: format::fmt_price(row.price),
                change: format::fmt_signed_percent(row.change_24h),
                change_class: change_class(row.change_24h),
                rsi: format::fmt_rsi(row.rsi),
                rsi_class: rsi_class(row.rsi),
                dip: format::fmt_percent(row.dip_percent),
                spike: format::fmt_spike(row.volume_spike),
                signal: signal.as_str(),
                signal_class: signal.css_class(),
                selected: selected == Some(row.symbol.as_str()),
                watched: state.watchlist.contains(&row.symbol),
            }
        })
        .collect();

    let open_trades: Vec<_> = state.ledger.open().iter().map(trade_line).collect();
    let closed_trades: Vec<_> = state
        .ledger
        .closed_display()
        .into_iter()
        .map(trade_line)
        .collect();

    RenderModel {
        connection_text: if state.connected { "Connected" } else { "Disconnected" },
        connection_class: if state.connected { "connected" } else { "disconnected" },
        running_text: if state.running { "Running" } else { "Stopped" },
        running_class: if state.running { "running" } else { "stopped" },
        mode_text: if state.paper_mode { "PAPER" } else { "LIVE" },
        mode_class: if state.paper_mode { "paper" } else { "live" },

        balance_text: format::fmt_money(state.balance),
        pnl_text: format::fmt_money(state.total_pnl),
        pnl_class: if state.total_pnl < 0.0 { "negative" } else { "positive" },
        open_position_text: state.open_position_count.to_string(),
        last_update_text: state.last_update.clone().unwrap_or_else(|| "never".to_string()),
        clock_text: state.current_time.clone(),

        price_rows,
        market_rows: state.market.iter().map(market_row).collect(),

        open_trades_empty: if open_trades.is_empty() {
            Some(if state.ledger.loaded() { "No open positions" } else { "Loading..." })
        } else {
            None
        },
        open_trades,
        closed_trades_empty: if closed_trades.is_empty() {
            Some(if state.ledger.loaded() { "No closed trades yet" } else { "Loading..." })
        } else {
            None
        },
        closed_trades,
        closed_total_text: state.ledger.closed_total().to_string(),

        triggers: trigger_form(&state.triggers),
        chart: state.chart.focused().map(|focus| {
            let ind = focus.indicators.as_ref();
            ChartView {
                symbol: focus.symbol.clone(),
                timeframe: focus.timeframe.clone(),
                rsi: format::fmt_rsi(ind.and_then(|i| i.rsi)),
                rsi_class: rsi_class(ind.and_then(|i| i.rsi)),
                high_24h: ind.map(|i| format::fmt_price(i.high_24h)).unwrap_or_else(|| "N/A".into()),
                low_24h: ind.map(|i| format::fmt_price(i.low_24h)).unwrap_or_else(|| "N/A".into()),
                dip: ind.map(|i| format::fmt_percent(i.dip_percent)).unwrap_or_else(|| "N/A".into()),
                overlay_x: focus.overlay.x,
                overlay_y: focus.overlay.y,
            }
        }),
        log_lines: state
            .log
            .iter()
            .map(|e| LogLineView {
                ts: e.ts.clone(),
                message: e.message.clone(),
                class: e.severity.css_class(),
            })
            .collect(),
        alert: state.alert.clone(),
    }
}

fn trade_line(trade: &Trade) -> TradeLineView {
    let pnl = ledger::pnl_line(trade);
    TradeLineView {
        summary: format!(
            "{} {} {} @ {}",
            trade.side.as_str(),
            trade.quantity,
            trade.symbol,
            format::fmt_price(trade.entry_price)
        ),
        pnl_class: match trade.pnl {
            Some(v) if v < 0.0 => "negative",
            _ => "positive",
        },
        pnl_line: pnl.unwrap_or_default(),
    }
}

fn market_row(coin: &MarketCoin) -> MarketRowView {
    MarketRowView {
        rank: format!("#{}", coin.rank),
        name: coin.name.clone(),
        symbol: coin.symbol.clone(),
        price: format::fmt_price(coin.price),
        change: format::fmt_signed_percent(coin.change_24h),
        change_class: change_class(coin.change_24h),
        market_cap: format::fmt_compact(coin.market_cap),
        volume: format::fmt_compact(coin.volume),
    }
}

fn trigger_form(ed: &TriggerEditor) -> TriggerFormView {
    let dirty = match ed.confirmed() {
        Some(confirmed) => {
            serde_json::to_string(confirmed).ok() != serde_json::to_string(&ed.to_wire()).ok()
        }
        None => false,
    };
    TriggerFormView {
        pairs: vec![
            TriggerPairView { label: "Buy when RSI below", slider: ed.buy_rsi_below.slider(), input: ed.buy_rsi_below.input() },
            TriggerPairView { label: "Buy on dip %", slider: ed.buy_dip_percent.slider(), input: ed.buy_dip_percent.input() },
            TriggerPairView { label: "Buy on volume spike", slider: ed.buy_volume_spike.slider(), input: ed.buy_volume_spike.input() },
            TriggerPairView { label: "Sell when RSI above", slider: ed.sell_rsi_above.slider(), input: ed.sell_rsi_above.input() },
            TriggerPairView { label: "Sell on rise %", slider: ed.sell_rise_percent.slider(), input: ed.sell_rise_percent.input() },
            TriggerPairView { label: "Stop loss %", slider: ed.sell_stop_loss.slider(), input: ed.sell_stop_loss.input() },
            TriggerPairView { label: "Take profit %", slider: ed.sell_take_profit.slider(), input: ed.sell_take_profit.input() },
        ],
        buy_require_all: ed.buy_require_all,
        buy_enabled: ed.buy_enabled,
        sell_enabled: ed.sell_enabled,
        dirty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::{AppEvent, PushEvent};
    use crate::app::reducer::reduce;
    use crate::wire::{CoinPriceRow, DashboardSnapshot};

    fn btc_row() -> CoinPriceRow {
        CoinPriceRow {
            symbol: "BTC/USDT".to_string(),
            price: 65000.0,
            change_24h: 2.5,
            rsi: Some(25.0),
            dip_percent: 1.0,
            volume_spike: 1.2,
        }
    }

    #[test]
    fn signal_classification_is_deterministic() {
        assert_eq!(Signal::classify(Some(25.0), 0.0), Signal::Buy);
        assert_eq!(Signal::classify(Some(50.0), 6.0), Signal::Buy);
        // Oversold wins even when overbought can't apply.
        assert_eq!(Signal::classify(Some(29.9), 6.0), Signal::Buy);
        assert_eq!(Signal::classify(Some(75.0), 0.0), Signal::Sell);
        assert_eq!(Signal::classify(Some(50.0), 5.0), Signal::Hold);
        assert_eq!(Signal::classify(Some(30.0), 0.0), Signal::Hold);
        assert_eq!(Signal::classify(Some(70.0), 0.0), Signal::Hold);
        // Absent RSI: only the dip condition can produce BUY, never SELL.
        assert_eq!(Signal::classify(None, 6.0), Signal::Buy);
        assert_eq!(Signal::classify(None, 1.0), Signal::Hold);
    }

    #[test]
    fn rsi_badge_classes() {
        assert_eq!(rsi_class(Some(25.0)), "oversold");
        assert_eq!(rsi_class(Some(75.0)), "overbought");
        assert_eq!(rsi_class(Some(50.0)), "neutral");
        assert_eq!(rsi_class(None), "neutral");
    }

    #[test]
    fn snapshot_renders_formatted_row() {
        let mut state = AppState::new();
        reduce(
            &mut state,
            AppEvent::Push(PushEvent::Snapshot(DashboardSnapshot {
                balance: 10000.0,
                total_pnl: -12.5,
                open_position_count: 2,
                running: true,
                paper_mode: true,
                prices: vec![btc_row()],
                last_update: Some("2026-01-01T00:00:00Z".to_string()),
            })),
        );
        let model = render(&state);

        assert_eq!(model.balance_text, "$10,000.00");
        assert_eq!(model.pnl_text, "-$12.50");
        assert_eq!(model.pnl_class, "negative");
        assert_eq!(model.running_text, "Running");
        assert_eq!(model.mode_text, "PAPER");

        let row = &model.price_rows[0];
        assert_eq!(row.price, "65,000.00");
        assert_eq!(row.rsi, "25.0");
        assert_eq!(row.rsi_class, "oversold");
        assert_eq!(row.signal, "BUY");
        assert_eq!(row.signal_class, "buy");
        assert!(row.watched, "BTC/USDT is a default watchlist entry");
    }

    #[test]
    fn rendering_is_a_pure_function_of_state() {
        let mut state = AppState::new();
        reduce(
            &mut state,
            AppEvent::Push(PushEvent::Snapshot(DashboardSnapshot {
                balance: 1.0,
                total_pnl: 0.0,
                open_position_count: 0,
                running: false,
                paper_mode: true,
                prices: vec![btc_row()],
                last_update: None,
            })),
        );
        assert_eq!(render(&state), render(&state));
    }

    #[test]
    fn empty_ledger_text_distinguishes_loading_from_empty() {
        let mut state = AppState::new();
        let model = render(&state);
        assert_eq!(model.open_trades_empty, Some("Loading..."));

        state.ledger.apply(Default::default());
        let model = render(&state);
        assert_eq!(model.open_trades_empty, Some("No open positions"));
        assert_eq!(model.closed_trades_empty, Some("No closed trades yet"));
    }

    #[test]
    fn focused_chart_renders_indicator_panel() {
        let mut state = AppState::new();
        let seq = state.next_seq();
        state.chart.select("ETH/USDT", seq);
        let model = render(&state);
        let chart = model.chart.unwrap();
        assert_eq!(chart.symbol, "ETH/USDT");
        assert_eq!(chart.rsi, "N/A");
        assert_eq!(chart.high_24h, "N/A");

        state.chart.apply_indicators(
            seq,
            crate::wire::ChartIndicators {
                rsi: Some(72.0),
                high_24h: 3500.0,
                low_24h: 3300.0,
                dip_percent: 1.5,
            },
        );
        let chart = render(&state).chart.unwrap();
        assert_eq!(chart.rsi, "72.0");
        assert_eq!(chart.rsi_class, "overbought");
        assert_eq!(chart.high_24h, "3,500.00");
    }

    #[test]
    fn trigger_form_reports_unsaved_edits() {
        let mut state = AppState::new();
        state.triggers.load(&Default::default());
        assert!(!render(&state).triggers.dirty);

        state.triggers.set(
            crate::triggers::TriggerField::BuyRsiBelow,
            crate::triggers::Control::Slider,
            22.0,
        );
        assert!(render(&state).triggers.dirty);

        state.triggers.mark_saved();
        assert!(!render(&state).triggers.dirty);
    }
}
