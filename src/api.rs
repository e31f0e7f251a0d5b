//! Request/response client for the bot backend. Every endpoint is fallible;
//! callers treat outcomes as events and never retry automatically.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;

use crate::wire::{Ack, ChartIndicators, MarketCoin, StatusResponse, TradesResponse, TriggerConfigWire};

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        self.http
            .get(self.url("/api/status"))
            .send()
            .await
            .context("status request failed")?
            .json()
            .await
            .context("invalid status response")
    }

    pub async fn trades(&self) -> Result<TradesResponse> {
        self.http
            .get(self.url("/api/trades"))
            .send()
            .await
            .context("trades request failed")?
            .json()
            .await
            .context("invalid trades response")
    }

    /// Indicator summary for one symbol. The path wants `BASE-QUOTE`, not
    /// `BASE/QUOTE`.
    pub async fn chart(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<ChartIndicators> {
        let path_symbol = symbol.replace('/', "-");
        self.http
            .get(self.url(&format!("/api/chart/{path_symbol}")))
            .query(&[("timeframe", timeframe), ("limit", &limit.to_string())])
            .send()
            .await
            .with_context(|| format!("chart request failed for {symbol}"))?
            .json()
            .await
            .with_context(|| format!("invalid chart response for {symbol}"))
    }

    pub async fn market_top100(&self) -> Result<Vec<MarketCoin>> {
        self.http
            .get(self.url("/api/market/top100"))
            .send()
            .await
            .context("market overview request failed")?
            .json()
            .await
            .context("invalid market overview response")
    }

    pub async fn start_bot(&self) -> Result<Ack> {
        self.post_ack("/api/bot/start", json!({})).await
    }

    pub async fn stop_bot(&self) -> Result<Ack> {
        self.post_ack("/api/bot/stop", json!({})).await
    }

    pub async fn set_mode(&self, paper_mode: bool) -> Result<Ack> {
        self.post_ack("/api/mode", json!({ "paper_mode": paper_mode }))
            .await
    }

    pub async fn save_triggers(&self, config: &TriggerConfigWire) -> Result<Ack> {
        let body = serde_json::to_value(config).context("failed to serialize triggers")?;
        self.post_ack("/api/triggers", body).await
    }

    pub async fn wallet_deposit(&self, amount: f64) -> Result<Ack> {
        self.post_ack("/api/wallet/deposit", json!({ "amount": amount }))
            .await
    }

    pub async fn wallet_withdraw(&self, amount: f64) -> Result<Ack> {
        self.post_ack("/api/wallet/withdraw", json!({ "amount": amount }))
            .await
    }

    pub async fn wallet_reset(&self, amount: f64) -> Result<Ack> {
        self.post_ack("/api/wallet/reset", json!({ "amount": amount }))
            .await
    }

    async fn post_ack(&self, path: &str, body: serde_json::Value) -> Result<Ack> {
        self.http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?
            .json()
            .await
            .with_context(|| format!("invalid response from {path}"))
    }
}
