//! Connection settings, loaded from a small key=value config file with
//! environment-variable overrides on top. Nothing secret lives here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use directories::ProjectDirs;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:5000/ws";
pub const DEFAULT_MARKET_POLL_SECS: u64 = 60;
pub const DEFAULT_RESYNC_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_base: String,
    pub ws_url: String,
    pub market_poll_secs: u64,
    pub resync_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            market_poll_secs: DEFAULT_MARKET_POLL_SECS,
            resync_secs: DEFAULT_RESYNC_SECS,
        }
    }
}

impl Settings {
    /// Config file, then `COINDECK_API_BASE` / `COINDECK_WS_URL` overrides.
    pub fn load() -> Self {
        let mut settings = Settings::default();
        if let Some(path) = config_path() {
            settings.load_file(&path);
        }

        if let Ok(base) = std::env::var("COINDECK_API_BASE") {
            if !base.trim().is_empty() {
                settings.api_base = base.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var("COINDECK_WS_URL") {
            if !url.trim().is_empty() {
                settings.ws_url = url.trim().to_string();
            }
        }
        settings
    }

    fn load_file(&mut self, path: &PathBuf) {
        let Ok(f) = File::open(path) else { return };
        let reader = BufReader::new(f);

        for line in reader.lines().map_while(Result::ok) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else { continue };
            self.apply(k.trim(), v.trim());
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "api_base" if !value.is_empty() => self.api_base = value.to_string(),
            "ws_url" if !value.is_empty() => self.ws_url = value.to_string(),
            "market_poll_secs" => {
                if let Ok(n) = value.parse::<u64>() {
                    self.market_poll_secs = n.max(5);
                }
            }
            "resync_secs" => {
                if let Ok(n) = value.parse::<u64>() {
                    self.resync_secs = n.max(1);
                }
            }
            _ => {}
        }
    }

}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coindeck").map(|dirs| dirs.config_dir().join("coindeck.conf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_ignored() {
        let mut s = Settings::default();
        s.apply("mystery_key", "whatever");
        assert_eq!(s.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn intervals_have_floors() {
        let mut s = Settings::default();
        s.apply("market_poll_secs", "0");
        assert_eq!(s.market_poll_secs, 5);
        s.apply("resync_secs", "0");
        assert_eq!(s.resync_secs, 1);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let mut s = Settings::default();
        s.apply("api_base", "");
        assert_eq!(s.api_base, DEFAULT_API_BASE);
        s.apply("api_base", "http://10.0.0.2:5000");
        assert_eq!(s.api_base, "http://10.0.0.2:5000");
    }
}
