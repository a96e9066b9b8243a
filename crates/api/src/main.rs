//! Scenario API - capacity what-if comparison service
//!
//! Serves the infrastructure snapshot and scenario comparison endpoints
//! together with health probes and Prometheus metrics.

use anyhow::Result;
use scenario_api::api::{self, AppState};
use scenario_api::config::ServerConfig;
use scenario_api::health::{components, HealthRegistry};
use scenario_api::observability::{ApiMetrics, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting scenario-api");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        api_port = config.api_port,
        max_body_bytes = config.max_body_bytes,
        "Server configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::HTTP_API).await;
    health_registry.register(components::SNAPSHOT_STORE).await;

    // Initialize metrics
    let metrics = ApiMetrics::new();

    // Initialize structured logger
    let logger = StructuredLogger::new("scenario-api");
    logger.log_startup(SERVICE_VERSION);

    // Create shared application state
    let app_state = Arc::new(AppState::new(
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(
        config.api_port,
        config.max_body_bytes,
        app_state,
    ));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
