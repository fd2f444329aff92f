//! Exporter configuration: optional `tzstats.toml` plus the `hashes` env var.

use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the comma-separated account list.
pub const HASHES_ENV: &str = "hashes";

pub const DEFAULT_API_URL: &str = "https://api.tzstats.com";
pub const DEFAULT_NETWORK: &str = "mainnet";
pub const DEFAULT_LISTEN_PORT: u16 = 8000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// On-disk layout: everything lives under an `[exporter]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    exporter: ExporterConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Base URL of the TzStats API, without trailing slash.
    pub api_url: String,
    /// Value of the `network` label on every sample.
    pub network: String,
    pub listen_port: u16,
    /// Per-request timeout, e.g. "10s", "500ms", "1m".
    pub request_timeout: String,
    /// Account identifiers polled on every scrape, in order.
    pub accounts: Vec<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            request_timeout: "10s".to_string(),
            accounts: Vec::new(),
        }
    }
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = file.exporter;
        config.accounts = normalize_accounts(config.accounts);
        config.validate()?;
        Ok(config)
    }

    /// Replace the account list with the value of `hashes`, if it is set.
    pub fn apply_env(&mut self) {
        self.apply_accounts_env(std::env::var_os(HASHES_ENV));
    }

    /// Apply a raw `hashes` value. `None` keeps the current accounts; a
    /// value that is not valid unicode yields an empty list.
    pub fn apply_accounts_env(&mut self, raw: Option<OsString>) {
        if let Some(raw) = raw {
            self.accounts = raw.to_str().map(parse_accounts).unwrap_or_default();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        parse_duration(&self.request_timeout).unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::Invalid("network must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        match parse_duration(&self.request_timeout) {
            None => {
                return Err(ConfigError::Invalid(format!(
                    "unparseable request_timeout {:?}",
                    self.request_timeout
                )));
            }
            Some(timeout) if timeout.is_zero() => {
                return Err(ConfigError::Invalid(
                    "request_timeout must be greater than zero".to_string(),
                ));
            }
            Some(_) => {}
        }
        Ok(())
    }
}

/// Split a comma-separated account list.
///
/// Entries are trimmed; blanks and repeats are dropped so the same series
/// is never emitted twice in one scrape.
pub fn parse_accounts(raw: &str) -> Vec<String> {
    normalize_accounts(raw.split(',').map(str::to_string))
}

fn normalize_accounts(accounts: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for account in accounts {
        let account = account.trim();
        if account.is_empty() || out.iter().any(|a| a == account) {
            continue;
        }
        out.push(account.to_string());
    }
    out
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
