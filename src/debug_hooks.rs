use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

static ENABLED: OnceLock<bool> = OnceLock::new();
static FILE_HANDLE: OnceLock<Mutex<std::fs::File>> = OnceLock::new();

fn logging_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("COINDECK_DEBUG_HOOKS")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
    })
}

fn log_file() -> &'static Mutex<std::fs::File> {
    FILE_HANDLE.get_or_init(|| {
        let _ = std::fs::create_dir_all("data");
        let path = Path::new("data").join("debug_hooks.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap_or_else(|_| {
                std::fs::File::create("/tmp/debug_hooks.log").expect("fallback log create")
            });
        Mutex::new(file)
    })
}

fn log_line(topic: &str, msg: impl AsRef<str>) {
    if !logging_enabled() {
        return;
    }

    let ts = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let formatted = format!("[{ts}][{topic}] {}", msg.as_ref());

    if let Ok(mut f) = log_file().lock() {
        let _ = writeln!(f, "{formatted}");
    }

    eprintln!("{formatted}");
}

pub fn log_bridge_start(url: &str) {
    log_line(
        "push.bridge",
        format!(
            "starting bridge; url={url} env=COINDECK_DEBUG_HOOKS={}",
            std::env::var("COINDECK_DEBUG_HOOKS").unwrap_or_else(|_| "(unset)".into())
        ),
    );
}

pub fn log_bridge_reconnect(err: &str) {
    log_line("push.bridge", format!("connection lost: {err}; retrying"));
}

pub fn log_push_ingest(frame: &str) {
    static COUNT: AtomicU64 = AtomicU64::new(0);
    let n = COUNT.fetch_add(1, Ordering::Relaxed) + 1;
    if n <= 10 || n % 50 == 0 {
        log_line("push.frame", format!("frame #{n} type={frame}"));
    }
}

pub fn log_push_parse_error(text: &str, err: &str) {
    log_line(
        "push.parse",
        format!("failed to parse frame: {text:?}; err={err}"),
    );
}

pub fn log_stale_drop(slot: &str, got_seq: u64, want_seq: u64) {
    log_line(
        "api.stale",
        format!("dropped {slot} response; seq={got_seq} current={want_seq}"),
    );
}

pub fn log_stale_poll(slot: &str, theirs: i64, ours: i64) {
    log_line(
        "api.stale",
        format!("dropped {slot} poll older than snapshot; theirs={theirs} ours={ours}"),
    );
}

pub fn log_chart_race(symbol: &str, seq: u64) {
    log_line(
        "chart.race",
        format!("late indicator response for {symbol} seq={seq} dropped"),
    );
}
