//! selgridd — the Selenium Grid exporter daemon.
//!
//! Serves Selenium Grid hub counters as Prometheus gauges. Every request
//! to the metrics path scrapes the hub once; every other path redirects
//! to the metrics path.
//!
//! # Usage
//!
//! ```text
//! selgridd --scrape-uri http://selenium-hub:4444 --listen-address :8080
//! selgridd --scrape-uri http://selenium-hub:4444 --grid-api hub-api --log-format json
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use selgrid_core::{ExporterConfig, GridApi};
use selgrid_core::config::{DEFAULT_LISTEN_ADDRESS, DEFAULT_METRICS_PATH, DEFAULT_SCRAPE_URI};
use selgrid_metrics::Exporter;

const DEFAULT_LOG_FILTER: &str = "info,selgridd=debug,selgrid_metrics=debug,selgrid_fetch=debug";

#[derive(Parser, Debug)]
#[command(name = "selgridd", version, about = "Prometheus exporter for Selenium Grid")]
struct Cli {
    /// Address on which to expose metrics. A bare `:port` listens on all
    /// IPv4 interfaces only; use `[::]:port` for IPv6.
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS)]
    listen_address: String,

    /// Path under which to expose metrics.
    #[arg(long = "telemetry-path", default_value = DEFAULT_METRICS_PATH)]
    metrics_path: String,

    /// URI on which to scrape Selenium Grid.
    #[arg(long, default_value = DEFAULT_SCRAPE_URI)]
    scrape_uri: String,

    /// Selenium Grid API to query: graphql, graphql-usage or hub-api.
    #[arg(long, default_value_t = GridApi::Graphql)]
    grid_api: GridApi,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> anyhow::Result<ExporterConfig> {
        ExporterConfig::new(
            &self.listen_address,
            &self.metrics_path,
            &self.scrape_uri,
            self.grid_api,
        )
        .context("invalid configuration")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = cli.config()?;
    run(config).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "starting selenium grid exporter");

    let exporter = Exporter::from_config(&config).context("invalid scrape URI")?;
    let router = selgrid_api::build_router(Arc::new(exporter), &config.metrics_path);

    let listener = TcpListener::bind(config.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address))?;

    info!(addr = %config.listen_address, path = %config.metrics_path, "metrics server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("selenium grid exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
