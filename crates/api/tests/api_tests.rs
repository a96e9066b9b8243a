//! Integration tests for the scenario API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use scenario_api::api::{create_router, AppState};
use scenario_api::health::{components, ComponentHealth, HealthRegistry};
use scenario_api::observability::{ApiMetrics, StructuredLogger};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::HTTP_API).await;
    health_registry.register(components::SNAPSHOT_STORE).await;

    let metrics = ApiMetrics::new();
    let logger = StructuredLogger::new("scenario-api-test");
    let state = Arc::new(AppState::new(health_registry, metrics, logger));
    let router = create_router(state.clone(), 1 << 20);

    (router, state)
}

/// One 15-host cluster running 470 cells of 4 vCPU x 32 GB
fn environment_body() -> Value {
    json!({
        "name": "prod",
        "clusters": [{
            "name": "az1",
            "host_count": 15,
            "memory_gb_per_host": 2048,
            "cpu_cores_per_host": 32,
            "ha_admission_pct": 0,
            "cell_count": 470,
            "cell_memory_gb": 32,
            "cell_cpu": 4,
            "cell_disk_gb": 100
        }],
        "platform_vms_gb": 4800,
        "total_app_memory_gb": 10500,
        "total_app_disk_gb": 2000,
        "total_app_instances": 7500
    })
}

/// Halves the cell count while doubling per-cell memory
fn scenario_body() -> Value {
    json!({
        "proposed_cell_count": 235,
        "proposed_cell_memory_gb": 64,
        "proposed_cell_cpu": 4,
        "proposed_cell_disk_gb": 200
    })
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let response = app.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["snapshot_store"].is_object());
    assert!(health["components"]["http_api"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .update(
            components::SNAPSHOT_STORE,
            ComponentHealth::unhealthy("Store poisoned"),
        )
        .await;

    let response = app.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = body_json(response).await;
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_returns_503_until_ready() {
    let (app, state) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/readyz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.health_registry.set_ready(true).await;

    let response = app.oneshot(get_request("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let readiness = body_json(response).await;
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, _state) = setup_test_app().await;

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(metrics_text.contains("scenario_api_compare_requests_total"));
    assert!(metrics_text.contains("scenario_api_snapshot_updates_total"));
    assert!(metrics_text.contains("scenario_api_validation_errors_total"));
}

#[tokio::test]
async fn test_get_infrastructure_404_without_snapshot() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(get_request("/api/v1/infrastructure"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("No infrastructure"));
}

#[tokio::test]
async fn test_snapshot_lifecycle() {
    let (app, _state) = setup_test_app().await;

    // initially the status endpoint reports no data
    let response = app
        .clone()
        .oneshot(get_request("/api/v1/infrastructure/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["has_data"], false);

    // setting the snapshot echoes the computed state back
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/infrastructure", &environment_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = body_json(response).await;
    assert_eq!(snapshot["total_host_count"], 15);
    assert_eq!(snapshot["total_cell_count"], 470);
    assert_eq!(snapshot["total_memory_gb"], 30_720);
    assert_eq!(snapshot["total_n1_memory_gb"], 28_672);

    // the stored snapshot is readable and the status reflects it
    let response = app
        .clone()
        .oneshot(get_request("/api/v1/infrastructure"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored = body_json(response).await;
    assert_eq!(stored["name"], "prod");
    assert_eq!(stored["total_cell_count"], 470);

    let response = app
        .oneshot(get_request("/api/v1/infrastructure/status"))
        .await
        .unwrap();
    let status = body_json(response).await;
    assert_eq!(status["has_data"], true);
    assert_eq!(status["host_count"], 15);
    assert_eq!(status["cell_count"], 470);
}

#[tokio::test]
async fn test_compare_400_without_snapshot() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(post_json("/api/v1/scenario/compare", &scenario_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("No infrastructure"));
}

#[tokio::test]
async fn test_compare_happy_path() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/infrastructure", &environment_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/api/v1/scenario/compare", &scenario_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let comparison = body_json(response).await;
    assert_eq!(comparison["current"]["cell_count"], 470);
    assert_eq!(comparison["current"]["cell_memory_gb"], 32);
    assert_eq!(comparison["proposed"]["cell_count"], 235);

    // halving the count at double the memory keeps capacity flat
    let current_capacity = comparison["current"]["app_capacity_gb"].as_f64().unwrap();
    let proposed_capacity = comparison["proposed"]["app_capacity_gb"].as_f64().unwrap();
    assert!((current_capacity - 13_987.2).abs() < 0.01);
    assert!((proposed_capacity - current_capacity).abs() < 0.01);

    assert_eq!(comparison["delta"]["resilience_change"], "reduced");
    let warnings = comparison["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w["message"]
            .as_str()
            .unwrap()
            .starts_with("Significant redundancy reduction")));
}

#[tokio::test]
async fn test_compare_rejects_invalid_input() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/infrastructure", &environment_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let invalid = json!({
        "proposed_cell_count": -1,
        "proposed_cell_memory_gb": 64
    });
    let response = app
        .oneshot(post_json("/api/v1/scenario/compare", &invalid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("must not be negative"));
}

#[tokio::test]
async fn test_compare_rejects_malformed_body() {
    let (app, _state) = setup_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/scenario/compare")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
