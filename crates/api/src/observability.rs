//! Observability infrastructure for the scenario API
//!
//! Provides:
//! - Prometheus metrics (request counts, comparison latency, warning
//!   counts, snapshot gauges)
//! - Structured JSON logging with tracing

use planner_lib::{ScenarioComparison, ScenarioWarning};
use prometheus::{
    register_histogram, register_int_gauge, register_int_gauge_vec, Histogram, IntGauge,
    IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ApiMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ApiMetricsInner {
    compare_requests: IntGauge,
    compare_latency_seconds: Histogram,
    warnings_emitted: IntGaugeVec,
    validation_errors: IntGauge,
    snapshot_updates: IntGauge,
    snapshot_cell_count: IntGauge,
    snapshot_host_count: IntGauge,
}

impl ApiMetricsInner {
    fn new() -> Self {
        Self {
            compare_requests: register_int_gauge!(
                "scenario_api_compare_requests_total",
                "Total number of scenario comparisons served"
            )
            .expect("Failed to register compare_requests"),

            compare_latency_seconds: register_histogram!(
                "scenario_api_compare_latency_seconds",
                "Time spent computing a scenario comparison",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register compare_latency_seconds"),

            warnings_emitted: register_int_gauge_vec!(
                "scenario_api_warnings_emitted_total",
                "Warnings emitted by scenario comparisons, by severity",
                &["severity"]
            )
            .expect("Failed to register warnings_emitted"),

            validation_errors: register_int_gauge!(
                "scenario_api_validation_errors_total",
                "Scenario requests rejected by input validation"
            )
            .expect("Failed to register validation_errors"),

            snapshot_updates: register_int_gauge!(
                "scenario_api_snapshot_updates_total",
                "Total number of infrastructure snapshot updates"
            )
            .expect("Failed to register snapshot_updates"),

            snapshot_cell_count: register_int_gauge!(
                "scenario_api_snapshot_cell_count",
                "Cell count in the current infrastructure snapshot"
            )
            .expect("Failed to register snapshot_cell_count"),

            snapshot_host_count: register_int_gauge!(
                "scenario_api_snapshot_host_count",
                "Host count in the current infrastructure snapshot"
            )
            .expect("Failed to register snapshot_host_count"),
        }
    }
}

/// API metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ApiMetrics {
    _private: (),
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ApiMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ApiMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Increment the comparison request counter
    pub fn inc_compare_requests(&self) {
        self.inner().compare_requests.inc();
    }

    /// Record a comparison latency observation
    pub fn observe_compare_latency(&self, duration_secs: f64) {
        self.inner().compare_latency_seconds.observe(duration_secs);
    }

    /// Count the warnings a comparison emitted, grouped by severity
    pub fn record_warnings(&self, warnings: &[ScenarioWarning]) {
        for warning in warnings {
            let severity = warning.severity.to_string();
            self.inner()
                .warnings_emitted
                .with_label_values(&[severity.as_str()])
                .inc();
        }
    }

    /// Increment the validation error counter
    pub fn inc_validation_errors(&self) {
        self.inner().validation_errors.inc();
    }

    /// Increment the snapshot update counter
    pub fn inc_snapshot_updates(&self) {
        self.inner().snapshot_updates.inc();
    }

    /// Update the snapshot gauges
    pub fn set_snapshot_gauges(&self, cell_count: i64, host_count: i64) {
        self.inner().snapshot_cell_count.set(cell_count);
        self.inner().snapshot_host_count.set(host_count);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for snapshot updates and
/// scenario comparisons.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "startup",
            service = %self.service,
            version = %version,
            "Service starting"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "shutdown",
            service = %self.service,
            reason = %reason,
            "Service shutting down"
        );
    }

    /// Log an infrastructure snapshot update
    pub fn log_snapshot_update(
        &self,
        name: &str,
        cluster_count: usize,
        host_count: i64,
        cell_count: i64,
    ) {
        info!(
            event = "snapshot_updated",
            service = %self.service,
            name = %name,
            cluster_count = cluster_count,
            host_count = host_count,
            cell_count = cell_count,
            "Infrastructure snapshot updated"
        );
    }

    /// Log a completed scenario comparison
    pub fn log_comparison(&self, comparison: &ScenarioComparison) {
        let critical_count = comparison
            .warnings
            .iter()
            .filter(|w| w.severity == planner_lib::Severity::Critical)
            .count();
        let bottleneck = comparison
            .proposed
            .bottleneck
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());

        if critical_count > 0 {
            warn!(
                event = "scenario_compared",
                service = %self.service,
                current_cells = comparison.current.cell_count,
                current_cell_size = %comparison.current.cell_size(),
                proposed_cells = comparison.proposed.cell_count,
                proposed_cell_size = %comparison.proposed.cell_size(),
                warnings = comparison.warnings.len(),
                critical_warnings = critical_count,
                bottleneck = %bottleneck,
                "Scenario comparison produced critical warnings"
            );
        } else {
            info!(
                event = "scenario_compared",
                service = %self.service,
                current_cells = comparison.current.cell_count,
                current_cell_size = %comparison.current.cell_size(),
                proposed_cells = comparison.proposed.cell_count,
                proposed_cell_size = %comparison.proposed.cell_size(),
                warnings = comparison.warnings.len(),
                critical_warnings = critical_count,
                bottleneck = %bottleneck,
                "Scenario comparison complete"
            );
        }
    }
}
