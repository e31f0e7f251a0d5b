use crate::triggers::{Control, TriggerField};
use crate::wire::{
    Ack, ChartIndicators, DashboardSnapshot, MarketCoin, StatusResponse, TradeSide, TradesResponse,
};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Ui(UiEvent),
    Push(PushEvent),
    Api(ApiEvent),
    Timer(TimerEvent),
}

/// Operator actions arriving from the presentation layer.
#[derive(Debug, Clone)]
pub enum UiEvent {
    RowSelected { symbol: String },
    ChartClosed,
    TimeframeChanged { timeframe: String },
    ManualTrade { side: TradeSide },

    OverlayPressed { x: f64, y: f64, on_control: bool },
    OverlayDragged { x: f64, y: f64, max_x: f64, max_y: f64 },
    OverlayReleased,

    TriggerChanged { field: TriggerField, control: Control, value: f64 },
    BuyRequireAllToggled { enabled: bool },
    BuyTriggersToggled { enabled: bool },
    SellTriggersToggled { enabled: bool },
    SaveTriggers,

    WatchlistAdd { symbol: String },
    WatchlistRemove { symbol: String },

    StartBot,
    StopBot,
    ModeChangeRequested { paper_mode: bool },

    Deposit { amount: f64 },
    Withdraw { amount: f64 },
    ResetWallet { amount: f64 },

    ClearLog,
    AlertDismissed,
}

/// Lifecycle and data notifications from the push channel.
#[derive(Debug, Clone)]
pub enum PushEvent {
    Connected,
    Disconnected,
    Snapshot(DashboardSnapshot),
    Trade {
        symbol: String,
        side: TradeSide,
        price: f64,
        reasons: Vec<String>,
    },
}

/// Completed request/response calls. Errors travel as display strings; the
/// reducer only ever logs them. `seq` echoes the sequence the request was
/// issued with so stale responses can be discarded at the reconciliation
/// boundary instead of trusting arrival order.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    StatusLoaded { seq: u64, result: Result<StatusResponse, String> },
    TradesLoaded { seq: u64, result: Result<TradesResponse, String> },
    MarketLoaded { seq: u64, result: Result<Vec<MarketCoin>, String> },
    ChartLoaded { seq: u64, symbol: String, result: Result<ChartIndicators, String> },
    TriggersSaved { result: Result<Ack, String> },
    BotStarted { result: Result<Ack, String> },
    BotStopped { result: Result<Ack, String> },
    ModeSet { paper_mode: bool, result: Result<Ack, String> },
    WalletDone { op: WalletOp, result: Result<Ack, String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOp {
    Deposit,
    Withdraw,
    Reset,
}

impl WalletOp {
    pub fn verb(&self) -> &'static str {
        match self {
            WalletOp::Deposit => "Deposit",
            WalletOp::Withdraw => "Withdrawal",
            WalletOp::Reset => "Wallet reset",
        }
    }
}

#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// Fires every 60 s regardless of push-channel connectivity.
    MarketPoll,
    Tick1s { now_unix: u64 },
}
