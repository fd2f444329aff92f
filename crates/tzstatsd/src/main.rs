//! tzstatsd: the TzStats Prometheus exporter.
//!
//! Assembles the exporter:
//! - TzStats API client
//! - Metric registry + collector
//! - HTTP server (`/metrics`, `/healthz`)
//!
//! Every scrape of `/metrics` runs a fresh collection pass; there is no
//! background polling.
//!
//! # Usage
//!
//! ```text
//! hashes=tz1...,tz1... tzstatsd --port 8000 --network mainnet
//! tzstatsd --config /etc/tzstats/tzstats.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tzstats_client::TzStatsClient;
use tzstats_core::ExporterConfig;
use tzstats_metrics::{Collector, MetricRegistry};

#[derive(Parser)]
#[command(name = "tzstatsd", about = "TzStats Prometheus exporter")]
struct Cli {
    /// TOML config file with an [exporter] table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Value of the `network` label.
    #[arg(long)]
    network: Option<String>,

    /// Base URL of the TzStats API.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tzstatsd=debug,tzstats=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    run(config).await
}

/// File first, then flags, then the `hashes` env var.
fn load_config(cli: &Cli) -> anyhow::Result<ExporterConfig> {
    let mut config = match &cli.config {
        Some(path) => ExporterConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ExporterConfig::default(),
    };

    if let Some(port) = cli.port {
        config.listen_port = port;
    }
    if let Some(network) = &cli.network {
        config.network = network.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    config.apply_env();
    config.validate()?;
    Ok(config)
}

async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    info!("tzstats exporter starting");

    let client = TzStatsClient::new(&config.api_url, config.request_timeout())?;
    info!(
        api_url = %config.api_url,
        timeout_ms = config.request_timeout().as_millis() as u64,
        "tzstats client initialized"
    );

    let registry = Arc::new(MetricRegistry::new());
    if config.accounts.is_empty() {
        warn!("no accounts configured, only explorer metrics will be exported");
    }
    let collector = Collector::new(
        Arc::new(client),
        registry.clone(),
        config.accounts.clone(),
        config.network.clone(),
    );
    info!(
        accounts = config.accounts.len(),
        network = %config.network,
        metrics = registry.len(),
        "collector initialized"
    );

    let router = tzstats_api::build_router(Arc::new(collector));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));

    info!(%addr, "metrics server starting");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("tzstats exporter stopped");
    Ok(())
}
