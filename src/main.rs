//! Movies aggregator server.
//!
//! Loads configuration, installs tracing and serves the REST API until
//! interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use movies_aggregator::api::rest::{AppState, create_router};
use movies_aggregator::application::services::MovieAggregationService;
use movies_aggregator::config::{AppConfig, LogConfig, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "movies-aggregator", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log);

    info!(
        movies_info_url = %config.upstream.movies_info_url,
        reviews_url = %config.upstream.reviews_url,
        max_attempts = config.retry.max_attempts,
        delay_ms = config.retry.delay_ms,
        "starting movies aggregator"
    );

    let service = MovieAggregationService::from_config(&config)
        .context("building aggregation service")?;
    let router = create_router(Arc::new(AppState::new(service)));

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("stopped");
    Ok(())
}
