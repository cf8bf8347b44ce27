//! KubeAdjust Advisor - resource sizing suggestions over HTTP
//!
//! Runs in-cluster next to the dashboard backend, which posts namespace
//! snapshots and usage history and renders the returned suggestions.

use advisor::{api, config};
use advisor_lib::observability::{AdvisorMetrics, StructuredLogger};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ADVISOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting kubeadjust-advisor");

    let config = config::AdvisorConfig::load()?;
    info!(node_name = %config.node_name, addr = %config.addr(), "Advisor configured");

    let metrics = AdvisorMetrics::new();
    let logger = StructuredLogger::new(&config.node_name);
    logger.log_startup(ADVISOR_VERSION, &config.addr());

    let app_state = Arc::new(api::AppState::new(
        metrics,
        logger.clone(),
        &config.node_name,
    ));

    let server = api::serve(config.addr(), app_state.clone());

    tokio::select! {
        result = server => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            app_state.set_ready(false);
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
