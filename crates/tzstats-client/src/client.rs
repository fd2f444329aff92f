//! HTTP client for the TzStats explorer endpoints.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tzstats_core::{AccountSnapshot, Snapshot, TipSnapshot};

use crate::error::{ClientError, ClientResult};

/// Upstream data source for one collection pass.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Numeric fields of one account.
    async fn get_account(&self, hash: &str) -> ClientResult<AccountSnapshot>;

    /// Numeric fields of the current chain head.
    async fn get_explorer_tip(&self) -> ClientResult<TipSnapshot>;
}

/// `StatsApi` backed by the public TzStats REST API.
#[derive(Debug, Clone)]
pub struct TzStatsClient {
    http: reqwest::Client,
    base_url: String,
}

impl TzStatsClient {
    /// Build a client for `base_url` (e.g. `https://api.tzstats.com`).
    ///
    /// `timeout` bounds every request, connect included.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tzstats-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, hash: &str) -> ClientResult<String> {
        let hash = hash.trim();
        if hash.is_empty() || hash.contains(['/', '?', '#']) {
            return Err(ClientError::InvalidAccount(hash.to_string()));
        }
        Ok(format!("{}/explorer/account/{hash}", self.base_url))
    }

    async fn fetch(&self, url: String) -> ClientResult<Snapshot> {
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(%status, %url, "tzstats request non-2xx");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        let Some(snapshot) = Snapshot::from_json(&value) else {
            return Err(ClientError::NotAnObject { url });
        };
        debug!(%url, fields = snapshot.len(), "tzstats response decoded");
        Ok(snapshot)
    }
}

#[async_trait]
impl StatsApi for TzStatsClient {
    async fn get_account(&self, hash: &str) -> ClientResult<AccountSnapshot> {
        let url = self.account_url(hash)?;
        self.fetch(url).await
    }

    async fn get_explorer_tip(&self) -> ClientResult<TipSnapshot> {
        self.fetch(format!("{}/explorer/tip", self.base_url)).await
    }
}
