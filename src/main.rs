// Headless dashboard runtime. Connects the push bridge, the REST client and
// the timers to one event loop, and prints a compact status line whenever
// the view model changes. Embedding UIs drive the same AppRuntime directly.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::interval;

use coindeck::api::ApiClient;
use coindeck::app::state::now_unix;
use coindeck::app::{commands, AlwaysConfirm, AppEvent, AppRuntime, RenderModel, TimerEvent};
use coindeck::chart::{ChartHost, PrintChartHost};
use coindeck::feed;
use coindeck::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    install_rustls_provider()?;

    let settings = Settings::load();
    println!("[coindeck] api={} ws={}", settings.api_base, settings.ws_url);

    let api = Arc::new(ApiClient::new(&settings.api_base)?);
    let chart_host: Arc<dyn ChartHost> = Arc::new(PrintChartHost);

    let (tx, mut rx) = unbounded_channel::<AppEvent>();
    tokio::spawn(feed::run_bridge(
        settings.ws_url.clone(),
        settings.resync_secs,
        tx.clone(),
    ));

    let mut runtime = AppRuntime::new(AlwaysConfirm);

    // Seed status, triggers and the trade ledger over REST right away; the
    // push channel may be down while the API is reachable.
    runtime.bootstrap();
    for cmd in runtime.take_commands() {
        commands::dispatch(cmd, &api, &chart_host, &tx);
    }

    let mut clock = interval(Duration::from_secs(1));
    let mut market_poll = interval(Duration::from_secs(settings.market_poll_secs));

    loop {
        tokio::select! {
            ev = rx.recv() => {
                let Some(ev) = ev else { break };
                runtime.handle_event(ev);
            }
            _ = clock.tick() => {
                runtime.handle_event(AppEvent::Timer(TimerEvent::Tick1s { now_unix: now_unix() }));
            }
            _ = market_poll.tick() => {
                runtime.handle_event(AppEvent::Timer(TimerEvent::MarketPoll));
            }
            _ = tokio::signal::ctrl_c() => {
                println!("[coindeck] shutting down");
                break;
            }
        }

        for cmd in runtime.take_commands() {
            commands::dispatch(cmd, &api, &chart_host, &tx);
        }

        if let Some(model) = runtime.render_if_dirty() {
            print_status_line(&model);
        }
    }

    Ok(())
}

fn print_status_line(model: &RenderModel) {
    println!(
        "[coindeck] {} | {} | {} | balance {} | pnl {} | {} coins | {} open",
        model.connection_text,
        model.running_text,
        model.mode_text,
        model.balance_text,
        model.pnl_text,
        model.price_rows.len(),
        model.open_trades.len(),
    );
    if let Some(alert) = &model.alert {
        eprintln!("[coindeck] ALERT: {alert}");
    }
}

fn install_rustls_provider() -> Result<()> {
    // Rustls 0.23 requires a process-wide crypto provider. Opt into the ring
    // backend explicitly so the websocket handshake can succeed. If another
    // part of the process already installed a provider, keep running.
    let _ = rustls::crypto::ring::default_provider().install_default();
    Ok(())
}
