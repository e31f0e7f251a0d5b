//! Push-channel bridge. Tails the bot server's websocket, translates frames
//! into [`PushEvent`]s, and reconnects forever with a fixed backoff. The
//! bridge never touches state; everything flows through the event channel.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::app::{AppEvent, PushEvent};
use crate::debug_hooks;
use crate::wire::PushFrame;

const RECONNECT_DELAY_SECS: u64 = 3;

/// Runs the bridge until the event channel closes. Intended to be spawned.
pub async fn run_bridge(url: String, resync_secs: u64, tx: UnboundedSender<AppEvent>) {
    debug_hooks::log_bridge_start(&url);

    loop {
        match run_connection(&url, resync_secs, &tx).await {
            Ok(_) => {
                println!("[feed] stream ended cleanly, reconnecting");
            }
            Err(err) => {
                eprintln!("[feed] error: {err:?}");
                debug_hooks::log_bridge_reconnect(&format!("{err:#}"));
            }
        }

        if tx.send(AppEvent::Push(PushEvent::Disconnected)).is_err() {
            return;
        }
        sleep(Duration::from_secs(RECONNECT_DELAY_SECS)).await;
    }
}

async fn run_connection(
    url: &str,
    resync_secs: u64,
    tx: &UnboundedSender<AppEvent>,
) -> Result<()> {
    let (mut ws, _) = connect_async(url)
        .await
        .context("failed to connect to bot websocket")?;
    println!("[feed] connected to {url}");

    tx.send(AppEvent::Push(PushEvent::Connected)).ok();

    // Ask for a snapshot immediately so the UI hydrates without waiting for
    // the server's next broadcast.
    request_update(&mut ws).await?;

    let mut resync = interval(Duration::from_secs(resync_secs.max(1)));
    resync.set_missed_tick_behavior(MissedTickBehavior::Delay);
    resync.tick().await;

    loop {
        tokio::select! {
            _ = resync.tick() => {
                request_update(&mut ws).await?;
            }
            msg = ws.next() => {
                let Some(msg) = msg else {
                    return Ok(());
                };
                match msg {
                    Ok(Message::Text(txt)) => handle_frame(&txt, tx),
                    Ok(Message::Binary(_)) => {
                        // ignore
                    }
                    Ok(Message::Ping(payload)) => {
                        ws.send(Message::Pong(payload)).await.ok();
                    }
                    Ok(Message::Close(frame)) => {
                        println!("[feed] close frame: {frame:?}");
                        return Ok(());
                    }
                    Err(err) => {
                        return Err(err.into());
                    }
                    _ => {}
                }
            }
        }
    }
}

async fn request_update(ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>) -> Result<()> {
    let msg = json!({ "type": "get_update" });
    ws.send(Message::Text(msg.to_string()))
        .await
        .context("failed to request snapshot")
}

fn handle_frame(txt: &str, tx: &UnboundedSender<AppEvent>) {
    let frame: PushFrame = match serde_json::from_str(txt) {
        Ok(frame) => frame,
        Err(err) => {
            // Unknown frames are skipped, not fatal.
            debug_hooks::log_push_parse_error(txt, &err.to_string());
            return;
        }
    };

    let event = match frame {
        PushFrame::Update(snapshot) => {
            debug_hooks::log_push_ingest("update");
            PushEvent::Snapshot(snapshot)
        }
        PushFrame::Trade { symbol, signal, price, reasons } => {
            debug_hooks::log_push_ingest("trade");
            PushEvent::Trade { symbol, side: signal, price, reasons }
        }
    };
    tx.send(AppEvent::Push(event)).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn update_frame_becomes_snapshot_event() {
        let (tx, mut rx) = unbounded_channel();
        handle_frame(
            r#"{"type": "update", "balance": 500.0, "prices": []}"#,
            &tx,
        );
        match rx.try_recv().unwrap() {
            AppEvent::Push(PushEvent::Snapshot(snap)) => assert_eq!(snap.balance, 500.0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn malformed_frame_is_skipped() {
        let (tx, mut rx) = unbounded_channel();
        handle_frame("not json", &tx);
        handle_frame(r#"{"type": "mystery"}"#, &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn server_status_frame_never_flips_connectivity() {
        // Connectivity is owned by the transport; a data frame claiming
        // otherwise is skipped like any unknown frame.
        let (tx, mut rx) = unbounded_channel();
        handle_frame(r#"{"type": "status", "connected": false}"#, &tx);
        handle_frame(r#"{"type": "status", "connected": true}"#, &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn trade_frame_carries_reasons() {
        let (tx, mut rx) = unbounded_channel();
        handle_frame(
            r#"{"type": "trade", "symbol": "BTC/USDT", "signal": "buy",
                "price": 65000.0, "reasons": ["rsi_below"]}"#,
            &tx,
        );
        match rx.try_recv().unwrap() {
            AppEvent::Push(PushEvent::Trade { symbol, reasons, .. }) => {
                assert_eq!(symbol, "BTC/USDT");
                assert_eq!(reasons, vec!["rsi_below".to_string()]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
