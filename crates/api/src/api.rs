//! HTTP API for snapshot updates, scenario comparison, health checks
//! and Prometheus metrics

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use planner_lib::{EnvironmentInput, InfrastructureState, ScenarioCalculator, ScenarioInput};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::info;

use crate::health::{components, ComponentStatus, HealthRegistry};
use crate::observability::{ApiMetrics, StructuredLogger};

/// Shared application state
pub struct AppState {
    pub snapshot: RwLock<Option<InfrastructureState>>,
    pub calculator: ScenarioCalculator,
    pub health_registry: HealthRegistry,
    pub metrics: ApiMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: ApiMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            snapshot: RwLock::new(None),
            calculator: ScenarioCalculator::new(),
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Summary of the stored snapshot for dashboards
#[derive(Debug, Serialize)]
struct InfrastructureStatus {
    has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ha_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n1_capacity_percent: Option<f64>,
}

/// Builds the snapshot from operator input and stores it as the new
/// baseline, echoing the computed state back.
async fn set_infrastructure(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EnvironmentInput>,
) -> impl IntoResponse {
    let snapshot = input.to_state();

    state.metrics.inc_snapshot_updates();
    state
        .metrics
        .set_snapshot_gauges(snapshot.total_cell_count, snapshot.total_host_count);
    state.logger.log_snapshot_update(
        &snapshot.name,
        snapshot.clusters.len(),
        snapshot.total_host_count,
        snapshot.total_cell_count,
    );
    state
        .health_registry
        .set_healthy(components::SNAPSHOT_STORE)
        .await;

    let mut stored = state.snapshot.write().await;
    *stored = Some(snapshot.clone());

    (StatusCode::OK, Json(snapshot))
}

/// Returns the stored snapshot.
async fn get_infrastructure(State(state): State<Arc<AppState>>) -> Response {
    let stored = state.snapshot.read().await;
    match stored.as_ref() {
        Some(snapshot) => (StatusCode::OK, Json(snapshot.clone())).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No infrastructure data available"),
    }
}

/// Lightweight summary of the stored snapshot.
async fn infrastructure_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stored = state.snapshot.read().await;
    let status = match stored.as_ref() {
        Some(snapshot) => {
            let n1_capacity_percent = if snapshot.total_n1_memory_gb > 0 {
                (snapshot.total_cell_memory_gb + snapshot.platform_vms_gb) as f64
                    / snapshot.total_n1_memory_gb as f64
                    * 100.0
            } else {
                0.0
            };
            InfrastructureStatus {
                has_data: true,
                name: Some(snapshot.name.clone()),
                cluster_count: Some(snapshot.clusters.len()),
                host_count: Some(snapshot.total_host_count),
                cell_count: Some(snapshot.total_cell_count),
                timestamp: Some(snapshot.timestamp),
                memory_utilization: Some(snapshot.host_memory_utilization_percent),
                ha_status: Some(snapshot.ha_status.to_string()),
                n1_capacity_percent: Some(n1_capacity_percent),
            }
        }
        None => InfrastructureStatus {
            has_data: false,
            name: None,
            cluster_count: None,
            host_count: None,
            cell_count: None,
            timestamp: None,
            memory_utilization: None,
            ha_status: None,
            n1_capacity_percent: None,
        },
    };

    (StatusCode::OK, Json(status))
}

/// Runs the scenario comparison against the stored snapshot.
async fn compare_scenario(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ScenarioInput>,
) -> Response {
    let snapshot = {
        let stored = state.snapshot.read().await;
        match stored.as_ref() {
            Some(snapshot) => snapshot.clone(),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "No infrastructure data. Set via /api/v1/infrastructure first.",
                )
            }
        }
    };

    let started = Instant::now();
    match state.calculator.compare(&snapshot, &input) {
        Ok(comparison) => {
            state.metrics.inc_compare_requests();
            state
                .metrics
                .observe_compare_latency(started.elapsed().as_secs_f64());
            state.metrics.record_warnings(&comparison.warnings);
            state.logger.log_comparison(&comparison);

            (StatusCode::OK, Json(comparison)).into_response()
        }
        Err(err) => {
            state.metrics.inc_validation_errors();
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/v1/infrastructure",
            post(set_infrastructure).get(get_infrastructure),
        )
        .route("/api/v1/infrastructure/status", get(infrastructure_status))
        .route("/api/v1/scenario/compare", post(compare_scenario))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, max_body_bytes: usize, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state, max_body_bytes);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
