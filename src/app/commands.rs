//! Side effects requested by the reducer. The reducer never performs I/O;
//! it queues commands on the state and the runtime drains and dispatches
//! them, feeding outcomes back in as [`ApiEvent`]s.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::chart::ChartHost;
use crate::wire::TriggerConfigWire;

use super::event::{ApiEvent, AppEvent, WalletOp};

#[derive(Debug, Clone)]
pub enum Command {
    FetchStatus { seq: u64 },
    FetchTrades { seq: u64 },
    FetchMarket { seq: u64 },
    FetchChart { seq: u64, symbol: String, timeframe: String },
    RenderChart { symbol: String },
    ClearChart,
    SaveTriggers(TriggerConfigWire),
    StartBot,
    StopBot,
    SetMode { paper_mode: bool },
    Wallet { op: WalletOp, amount: f64 },
}

/// Chart indicator fetch depth, mirrored from the original dashboard's
/// default `limit` query parameter.
const CHART_CANDLE_LIMIT: u32 = 100;

fn err_text(err: anyhow::Error) -> String {
    format!("{err:#}")
}

/// Spawns the work for one command. Every spawned task reports back exactly
/// one event; requests are never cancelled, so stale responses are filtered
/// by sequence in the reducer rather than suppressed here.
pub fn dispatch(
    cmd: Command,
    api: &Arc<ApiClient>,
    chart_host: &Arc<dyn ChartHost>,
    tx: &UnboundedSender<AppEvent>,
) {
    match cmd {
        Command::RenderChart { symbol } => {
            chart_host.show(&symbol);
            return;
        }
        Command::ClearChart => {
            chart_host.clear();
            return;
        }
        _ => {}
    }

    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match cmd {
            Command::FetchStatus { seq } => ApiEvent::StatusLoaded {
                seq,
                result: api.status().await.map_err(err_text),
            },
            Command::FetchTrades { seq } => ApiEvent::TradesLoaded {
                seq,
                result: api.trades().await.map_err(err_text),
            },
            Command::FetchMarket { seq } => ApiEvent::MarketLoaded {
                seq,
                result: api.market_top100().await.map_err(err_text),
            },
            Command::FetchChart { seq, symbol, timeframe } => ApiEvent::ChartLoaded {
                seq,
                result: api
                    .chart(&symbol, &timeframe, CHART_CANDLE_LIMIT)
                    .await
                    .map_err(err_text),
                symbol,
            },
            Command::SaveTriggers(config) => ApiEvent::TriggersSaved {
                result: api.save_triggers(&config).await.map_err(err_text),
            },
            Command::StartBot => ApiEvent::BotStarted {
                result: api.start_bot().await.map_err(err_text),
            },
            Command::StopBot => ApiEvent::BotStopped {
                result: api.stop_bot().await.map_err(err_text),
            },
            Command::SetMode { paper_mode } => ApiEvent::ModeSet {
                paper_mode,
                result: api.set_mode(paper_mode).await.map_err(err_text),
            },
            Command::Wallet { op, amount } => {
                let result = match op {
                    WalletOp::Deposit => api.wallet_deposit(amount).await,
                    WalletOp::Withdraw => api.wallet_withdraw(amount).await,
                    WalletOp::Reset => api.wallet_reset(amount).await,
                };
                ApiEvent::WalletDone {
                    op,
                    result: result.map_err(err_text),
                }
            }
            Command::RenderChart { .. } | Command::ClearChart => unreachable!(),
        };
        let _ = tx.send(AppEvent::Api(event));
    });
}
