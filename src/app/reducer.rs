//! Single dispatcher for every event source. Returns true when the visible
//! state changed; side effects are queued as commands on the state and
//! executed by the runtime after the reduce step.

use chrono::{Local, TimeZone};

use crate::debug_hooks;
use crate::watchlist::AddOutcome;
use crate::wire::Ack;

use super::commands::Command;
use super::event::*;
use super::state::{parse_update_ts, AppState};

pub fn reduce(state: &mut AppState, ev: AppEvent) -> bool {
    match ev {
        AppEvent::Ui(u) => reduce_ui(state, u),
        AppEvent::Push(p) => reduce_push(state, p),
        AppEvent::Api(a) => reduce_api(state, a),
        AppEvent::Timer(t) => reduce_timer(state, t),
    }
}

fn reduce_push(state: &mut AppState, ev: PushEvent) -> bool {
    match ev {
        PushEvent::Connected => {
            state.connected = true;
            state.log.success("Connected to bot server");

            // Eagerly seed status (triggers, mode) and the trade ledger; the
            // bridge itself already asked for a snapshot.
            let seq = state.next_seq();
            state.status_seq = seq;
            state.queue(Command::FetchStatus { seq });
            let seq = state.next_seq();
            state.trades_seq = seq;
            state.queue(Command::FetchTrades { seq });
            true
        }
        PushEvent::Disconnected => {
            state.connected = false;
            // Last known data stays on screen; only the badge flips.
            state.log.warning("Disconnected from bot server");
            true
        }
        PushEvent::Snapshot(snap) => {
            // Push snapshots apply wholesale and in arrival order, none
            // skipped. Freshness gating applies to polls, not to the push
            // channel.
            state.running = snap.running;
            state.paper_mode = snap.paper_mode;
            state.balance = snap.balance;
            state.total_pnl = snap.total_pnl;
            state.open_position_count = snap.open_position_count;
            state.prices = snap.prices;
            state.last_update_unix = parse_update_ts(&snap.last_update);
            state.last_update = snap.last_update;
            true
        }
        PushEvent::Trade { symbol, side, price, reasons } => {
            let detail = if reasons.is_empty() {
                String::new()
            } else {
                format!(" ({})", reasons.join(", "))
            };
            state.log.trade(format!(
                "{} {} @ {}{}",
                side.as_str(),
                symbol,
                crate::format::fmt_money(price),
                detail
            ));

            // The ledger is refreshed after every trade notification.
            let seq = state.next_seq();
            state.trades_seq = seq;
            state.queue(Command::FetchTrades { seq });
            true
        }
    }
}

fn reduce_api(state: &mut AppState, ev: ApiEvent) -> bool {
    match ev {
        ApiEvent::StatusLoaded { seq, result } => {
            if seq != state.status_seq {
                debug_hooks::log_stale_drop("status", seq, state.status_seq);
                return false;
            }
            match result {
                Ok(status) => {
                    // A polled status older than the rendered snapshot must
                    // not walk the display backwards.
                    if let (Some(theirs), Some(ours)) =
                        (parse_update_ts(&status.last_update), state.last_update_unix)
                    {
                        if theirs < ours {
                            debug_hooks::log_stale_poll("status", theirs, ours);
                            return false;
                        }
                    }
                    state.running = status.running;
                    state.paper_mode = status.paper_mode;
                    if let Some(balance) = status.balance {
                        state.balance = balance;
                    }
                    if let Some(pnl) = status.total_pnl {
                        state.total_pnl = pnl;
                    }
                    if let Some(triggers) = status.triggers.as_ref() {
                        state.triggers.load(triggers);
                    }
                    true
                }
                Err(err) => {
                    state.log.error(format!("Status refresh failed: {err}"));
                    true
                }
            }
        }
        ApiEvent::TradesLoaded { seq, result } => {
            if seq != state.trades_seq {
                debug_hooks::log_stale_drop("trades", seq, state.trades_seq);
                return false;
            }
            match result {
                Ok(trades) => {
                    state.ledger.apply(trades);
                    true
                }
                Err(err) => {
                    state.log.error(format!("Trade refresh failed: {err}"));
                    true
                }
            }
        }
        ApiEvent::MarketLoaded { seq, result } => {
            if seq != state.market_seq {
                debug_hooks::log_stale_drop("market", seq, state.market_seq);
                return false;
            }
            match result {
                Ok(coins) => {
                    state.market = coins;
                    true
                }
                Err(err) => {
                    state.log.error(format!("Market overview failed: {err}"));
                    true
                }
            }
        }
        ApiEvent::ChartLoaded { seq, symbol, result } => match result {
            Ok(data) => {
                let applied = state.chart.apply_indicators(seq, data);
                if !applied {
                    debug_hooks::log_chart_race(&symbol, seq);
                }
                applied
            }
            Err(err) => {
                state.log.error(format!("Indicator fetch for {symbol} failed: {err}"));
                true
            }
        },
        ApiEvent::TriggersSaved { result } => match result {
            Ok(ack) if ack.success => {
                state.triggers.mark_saved();
                state.log.success("Triggers saved");
                true
            }
            Ok(ack) => {
                // Edits stay in the buffer for retry.
                let reason = ack.error.unwrap_or_else(|| "rejected by server".into());
                state.log.error(format!("Trigger save rejected: {reason}"));
                true
            }
            Err(err) => {
                state.log.error(format!("Trigger save failed: {err}"));
                true
            }
        },
        ApiEvent::BotStarted { result } => match result {
            Ok(ack) if ack.success => {
                state.running = true;
                state.log.success("Bot started");
                true
            }
            Ok(ack) => {
                log_rejection(state, "Start", ack);
                true
            }
            Err(err) => {
                state.log.error(format!("Start request failed: {err}"));
                true
            }
        },
        ApiEvent::BotStopped { result } => match result {
            Ok(ack) if ack.success => {
                state.running = false;
                state.log.info("Bot stopped");
                true
            }
            Ok(ack) => {
                log_rejection(state, "Stop", ack);
                true
            }
            Err(err) => {
                state.log.error(format!("Stop request failed: {err}"));
                true
            }
        },
        ApiEvent::ModeSet { paper_mode, result } => match result {
            Ok(ack) if ack.success => {
                state.paper_mode = ack.paper_mode.unwrap_or(paper_mode);
                let label = if state.paper_mode { "PAPER" } else { "LIVE" };
                state.log.info(format!("Trading mode set to {label}"));
                true
            }
            Ok(ack) => {
                log_rejection(state, "Mode change", ack);
                true
            }
            Err(err) => {
                state.log.error(format!("Mode change failed: {err}"));
                true
            }
        },
        ApiEvent::WalletDone { op, result } => match result {
            Ok(ack) if ack.success => {
                state.log.success(format!("{} confirmed", op.verb()));
                true
            }
            Ok(ack) => {
                // Wallet rejections block: the balance display never moved,
                // so only the alert is raised.
                let reason = ack.error.unwrap_or_else(|| "rejected by server".into());
                state.alert = Some(format!("{} failed: {reason}", op.verb()));
                true
            }
            Err(err) => {
                state.log.error(format!("{} request failed: {err}", op.verb()));
                true
            }
        },
    }
}

fn log_rejection(state: &mut AppState, action: &str, ack: Ack) {
    let reason = ack.error.unwrap_or_else(|| "rejected by server".into());
    state.log.error(format!("{action} rejected: {reason}"));
}

fn reduce_ui(state: &mut AppState, ev: UiEvent) -> bool {
    match ev {
        UiEvent::RowSelected { symbol } => {
            let seq = state.next_seq();
            state.chart.select(&symbol, seq);
            let timeframe = state
                .chart
                .focused()
                .map(|f| f.timeframe.clone())
                .unwrap_or_default();
            state.queue(Command::FetchChart { seq, symbol: symbol.clone(), timeframe });
            state.queue(Command::RenderChart { symbol });
            true
        }
        UiEvent::ChartClosed => {
            if state.chart.focused().is_none() {
                return false;
            }
            state.chart.close();
            state.queue(Command::ClearChart);
            true
        }
        UiEvent::TimeframeChanged { timeframe } => {
            let seq = state.next_seq();
            match state.chart.set_timeframe(&timeframe, seq) {
                Some(symbol) => {
                    state.queue(Command::FetchChart { seq, symbol, timeframe });
                    true
                }
                None => false,
            }
        }
        UiEvent::ManualTrade { side } => {
            // Confirmation already happened at ingress. Deliberately a no-op
            // until the backend grows a manual-order endpoint.
            let Some(symbol) = state.chart.focused_symbol().map(String::from) else {
                return false;
            };
            state.log.warning(format!(
                "Manual {} {symbol}: not wired to the executor, no order submitted",
                side.as_str()
            ));
            true
        }
        UiEvent::OverlayPressed { x, y, on_control } => {
            let Some(focus) = state.chart.focused_mut() else {
                return false;
            };
            focus.overlay.press(x, y, on_control);
            false
        }
        UiEvent::OverlayDragged { x, y, max_x, max_y } => match state.chart.focused_mut() {
            Some(focus) => focus.overlay.drag_move(x, y, max_x, max_y),
            None => false,
        },
        UiEvent::OverlayReleased => {
            if let Some(focus) = state.chart.focused_mut() {
                focus.overlay.release();
            }
            false
        }
        UiEvent::TriggerChanged { field, control, value } => {
            state.triggers.set(field, control, value);
            true
        }
        UiEvent::BuyRequireAllToggled { enabled } => {
            state.triggers.buy_require_all = enabled;
            true
        }
        UiEvent::BuyTriggersToggled { enabled } => {
            state.triggers.buy_enabled = enabled;
            true
        }
        UiEvent::SellTriggersToggled { enabled } => {
            state.triggers.sell_enabled = enabled;
            true
        }
        UiEvent::SaveTriggers => {
            state.queue(Command::SaveTriggers(state.triggers.to_wire()));
            false
        }
        UiEvent::WatchlistAdd { symbol } => {
            match state.watchlist.add(&symbol) {
                AddOutcome::Added => {
                    let stored = symbol.trim().to_ascii_uppercase();
                    state.log.info(format!("Added {stored} to watchlist"));
                }
                AddOutcome::Duplicate => {
                    state
                        .log
                        .info(format!("{} is already on the watchlist", symbol.trim().to_ascii_uppercase()));
                }
                AddOutcome::Malformed => {
                    state.alert =
                        Some(format!("'{symbol}' is not a valid pair; expected BASE/QUOTE"));
                }
            }
            true
        }
        UiEvent::WatchlistRemove { symbol } => {
            if state.watchlist.remove(&symbol) {
                state.log.info(format!("Removed {} from watchlist", symbol.trim().to_ascii_uppercase()));
                true
            } else {
                false
            }
        }
        UiEvent::StartBot => {
            state.queue(Command::StartBot);
            false
        }
        UiEvent::StopBot => {
            state.queue(Command::StopBot);
            false
        }
        UiEvent::ModeChangeRequested { paper_mode } => {
            state.queue(Command::SetMode { paper_mode });
            false
        }
        UiEvent::Deposit { amount } => wallet_request(state, WalletOp::Deposit, amount),
        UiEvent::Withdraw { amount } => wallet_request(state, WalletOp::Withdraw, amount),
        UiEvent::ResetWallet { amount } => wallet_request(state, WalletOp::Reset, amount),
        UiEvent::ClearLog => {
            state.log.clear();
            true
        }
        UiEvent::AlertDismissed => {
            if state.alert.is_none() {
                return false;
            }
            state.alert = None;
            true
        }
    }
}

/// Client-side validation happens before any request exists: a non-positive
/// amount raises the alert and sends nothing.
fn wallet_request(state: &mut AppState, op: WalletOp, amount: f64) -> bool {
    if !amount.is_finite() || amount <= 0.0 {
        state.alert = Some(format!("{}: amount must be a positive number", op.verb()));
        return true;
    }
    state.queue(Command::Wallet { op, amount });
    false
}

fn reduce_timer(state: &mut AppState, ev: TimerEvent) -> bool {
    match ev {
        TimerEvent::MarketPoll => {
            let seq = state.next_seq();
            state.market_seq = seq;
            state.queue(Command::FetchMarket { seq });
            false
        }
        TimerEvent::Tick1s { now_unix } => {
            let new_time = Local
                .timestamp_opt(now_unix as i64, 0)
                .single()
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            if state.current_time == new_time {
                return false;
            }
            state.current_time = new_time;
            true
        }
    }
}
