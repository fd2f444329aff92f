//! tzstats-core: shared types and configuration for tzstats-exporter.
//!
//! Holds the numeric [`Snapshot`] built from one TzStats API response, the
//! `tzstats_` metric prefix, and [`ExporterConfig`], which layers an
//! optional `[exporter]` TOML table under the `hashes` environment variable.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ExporterConfig, parse_accounts, parse_duration};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
