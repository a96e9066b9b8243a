//! Core data models for capacity scenario planning
//!
//! Wire types for the snapshot update and scenario comparison contracts.
//! All fields serialize as snake_case; enums cross the wire lowercase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-provided configuration for one host cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: String,
    pub host_count: i64,
    pub memory_gb_per_host: i64,
    pub cpu_cores_per_host: i64,
    pub ha_admission_pct: i64,
    pub cell_count: i64,
    pub cell_memory_gb: i64,
    pub cell_cpu: i64,
    pub cell_disk_gb: i64,
}

/// Per-workload detail used to derive app totals and infer chunk sizing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadProfile {
    pub name: String,
    /// Total memory requested across all instances of the workload
    pub memory_mb: i64,
    pub disk_mb: i64,
    pub instances: i64,
}

/// Operator-supplied snapshot of the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentInput {
    pub name: String,
    pub clusters: Vec<ClusterConfig>,
    pub platform_vms_gb: i64,
    pub total_app_memory_gb: i64,
    pub total_app_disk_gb: i64,
    pub total_app_instances: i64,
    /// When non-empty, app totals and max instance memory derive from these
    pub workloads: Vec<WorkloadProfile>,
}

/// HA failure-tolerance status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaStatus {
    #[default]
    Ok,
    #[serde(rename = "at-risk")]
    AtRisk,
}

impl std::fmt::Display for HaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaStatus::Ok => write!(f, "ok"),
            HaStatus::AtRisk => write!(f, "at-risk"),
        }
    }
}

/// Computed metrics for one cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterState {
    pub name: String,
    pub host_count: i64,
    pub memory_gb: i64,
    pub cpu_cores: i64,
    pub memory_gb_per_host: i64,
    pub cpu_cores_per_host: i64,
    pub ha_admission_pct: i64,
    pub ha_usable_memory_gb: i64,
    pub ha_usable_cpu_cores: i64,
    pub ha_host_failures_survived: i64,
    pub ha_status: HaStatus,
    pub vms_per_host: f64,
    pub host_memory_utilization_percent: f64,
    pub host_cpu_utilization_percent: f64,
    pub n1_memory_gb: i64,
    pub usable_memory_gb: i64,
    pub cell_count: i64,
    pub cell_memory_gb: i64,
    pub cell_cpu: i64,
    pub cell_disk_gb: i64,
    pub total_vcpus: i64,
    pub total_cell_memory_gb: i64,
    pub vcpu_ratio: f64,
}

/// Computed infrastructure snapshot used as the baseline for scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureState {
    pub name: String,
    pub clusters: Vec<ClusterState>,
    pub total_memory_gb: i64,
    pub total_n1_memory_gb: i64,
    pub total_ha_usable_memory_gb: i64,
    pub total_ha_usable_cpu_cores: i64,
    pub ha_min_host_failures_survived: i64,
    pub ha_status: HaStatus,
    pub total_cell_memory_gb: i64,
    pub host_memory_utilization_percent: f64,
    pub host_cpu_utilization_percent: f64,
    pub total_host_count: i64,
    pub total_cell_count: i64,
    pub total_cpu_cores: i64,
    pub total_vcpus: i64,
    pub vcpu_ratio: f64,
    pub cpu_risk_level: CpuRiskLevel,
    pub platform_vms_gb: i64,
    pub total_app_memory_gb: i64,
    pub total_app_disk_gb: i64,
    pub total_app_instances: i64,
    pub max_instance_memory_mb: i64,
    pub avg_instance_memory_mb: i64,
    pub timestamp: DateTime<Utc>,
}

impl Default for InfrastructureState {
    fn default() -> Self {
        InfrastructureState {
            name: String::new(),
            clusters: Vec::new(),
            total_memory_gb: 0,
            total_n1_memory_gb: 0,
            total_ha_usable_memory_gb: 0,
            total_ha_usable_cpu_cores: 0,
            ha_min_host_failures_survived: 0,
            ha_status: HaStatus::Ok,
            total_cell_memory_gb: 0,
            host_memory_utilization_percent: 0.0,
            host_cpu_utilization_percent: 0.0,
            total_host_count: 0,
            total_cell_count: 0,
            total_cpu_cores: 0,
            total_vcpus: 0,
            vcpu_ratio: 0.0,
            cpu_risk_level: CpuRiskLevel::Conservative,
            platform_vms_gb: 0,
            total_app_memory_gb: 0,
            total_app_disk_gb: 0,
            total_app_instances: 0,
            max_instance_memory_mb: 0,
            avg_instance_memory_mb: 0,
            timestamp: Utc::now(),
        }
    }
}

/// Resource dimension selectable for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceDimension {
    Memory,
    Cpu,
    Disk,
}

impl std::fmt::Display for ResourceDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceDimension::Memory => write!(f, "memory"),
            ResourceDimension::Cpu => write!(f, "cpu"),
            ResourceDimension::Disk => write!(f, "disk"),
        }
    }
}

/// A hypothetical app added on top of the current workload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSpec {
    pub name: String,
    pub instances: i64,
    pub memory_gb: i64,
    pub disk_gb: i64,
}

/// One point on the scheduling throughput curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvePoint {
    pub cells: i64,
    pub tps: i64,
}

/// Proposed changes for what-if analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub proposed_cell_memory_gb: i64,
    pub proposed_cell_cpu: i64,
    pub proposed_cell_disk_gb: i64,
    pub proposed_cell_count: i64,
    /// Empty selection analyzes every dimension
    pub selected_resources: Vec<ResourceDimension>,
    /// Memory overhead percent; 0 falls back to the 7% default
    pub overhead_pct: f64,
    /// Staging chunk override in MB; 0 infers from the workload profile
    pub chunk_size_mb: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_app: Option<AppSpec>,
    /// Throughput estimation runs only when a curve is supplied
    pub tps_curve: Vec<CurvePoint>,
    // Host configuration for CPU and reserve-constraint analysis
    pub host_count: i64,
    pub physical_cores_per_host: i64,
    pub memory_per_host_gb: i64,
    pub target_vcpu_ratio: f64,
    /// Platform VM vCPUs subtracted from the CPU budget after the
    /// target ratio is applied
    pub platform_vcpus: i64,
    pub ha_admission_pct: f64,
}

impl ScenarioInput {
    /// True when a throughput curve was supplied.
    pub fn tps_enabled(&self) -> bool {
        !self.tps_curve.is_empty()
    }
}

/// vCPU:pCPU overcommit risk classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuRiskLevel {
    Conservative,
    Moderate,
    Aggressive,
    #[default]
    Unknown,
}

impl std::fmt::Display for CpuRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuRiskLevel::Conservative => write!(f, "conservative"),
            CpuRiskLevel::Moderate => write!(f, "moderate"),
            CpuRiskLevel::Aggressive => write!(f, "aggressive"),
            CpuRiskLevel::Unknown => write!(f, "unknown"),
        }
    }
}

/// Scheduling throughput classification against the curve peak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThroughputStatus {
    Optimal,
    Degraded,
    Critical,
    Unknown,
    #[default]
    Disabled,
}

impl std::fmt::Display for ThroughputStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThroughputStatus::Optimal => write!(f, "optimal"),
            ThroughputStatus::Degraded => write!(f, "degraded"),
            ThroughputStatus::Critical => write!(f, "critical"),
            ThroughputStatus::Unknown => write!(f, "unknown"),
            ThroughputStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Computed metrics for one scenario (current or proposed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioResult {
    pub cell_count: i64,
    pub cell_memory_gb: i64,
    pub cell_cpu: i64,
    pub cell_disk_gb: i64,
    pub app_capacity_gb: f64,
    pub disk_capacity_gb: f64,
    pub utilization_pct: f64,
    pub disk_utilization_pct: f64,
    pub free_chunks: i64,
    pub chunk_size_mb: i64,
    pub n1_utilization_pct: f64,
    pub fault_impact: i64,
    pub instances_per_cell: f64,
    pub total_vcpus: i64,
    pub total_pcpus: i64,
    pub vcpu_ratio: f64,
    pub cpu_risk_level: CpuRiskLevel,
    pub max_cells_by_memory: i64,
    pub max_cells_by_cpu: i64,
    pub max_cells_by_disk: i64,
    pub cpu_headroom_cells: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottleneck: Option<ResourceDimension>,
    pub estimated_tps: i64,
    pub tps_status: ThroughputStatus,
}

impl ScenarioResult {
    /// Formatted cell geometry like "4×32" (vCPU × memory GB).
    pub fn cell_size(&self) -> String {
        format!("{}×{}", self.cell_cpu, self.cell_memory_gb)
    }
}

/// Warning severity levels. No current rule emits `Info`; it exists so
/// the wire contract covers the full scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Configuration edit that triggered a warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigChange {
    pub field: String,
    pub previous_val: i64,
    pub proposed_val: i64,
    pub delta: i64,
    pub delta_pct: f64,
}

/// Suggested configuration fix for a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FixSuggestion {
    CellCount { value: i64 },
    CellCpu { value: i64 },
    HostCount { value: i64 },
}

impl std::fmt::Display for FixSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixSuggestion::CellCount { value } => write!(f, "Reduce cell count to {value}"),
            FixSuggestion::CellCpu { value } => write!(f, "Reduce vCPUs per cell to {value}"),
            FixSuggestion::HostCount { value } => write!(f, "Increase host count to {value}"),
        }
    }
}

/// A tradeoff warning with optional context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioWarning {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<ConfigChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<FixSuggestion>,
}

/// Direction of the redundancy change between scenarios
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResilienceChange {
    Improved,
    Reduced,
    #[default]
    Unchanged,
}

impl std::fmt::Display for ResilienceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResilienceChange::Improved => write!(f, "improved"),
            ResilienceChange::Reduced => write!(f, "reduced"),
            ResilienceChange::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Metric deltas between current and proposed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioDelta {
    pub capacity_change_gb: f64,
    pub disk_capacity_change_gb: f64,
    pub utilization_change_pct: f64,
    pub disk_utilization_change_pct: f64,
    pub vcpu_ratio_change: f64,
    pub resilience_change: ResilienceChange,
}

/// Which reserve policy a constraint models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    HaAdmission,
    #[default]
    NMinusX,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::HaAdmission => write!(f, "ha_admission"),
            ConstraintKind::NMinusX => write!(f, "n_minus_x"),
        }
    }
}

/// A single capacity reserve calculation (HA admission or N-1)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConstraint {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub reserved_gb: i64,
    pub reserved_pct: f64,
    pub usable_gb: i64,
    /// Hosts worth of capacity this reserve represents
    pub n_equivalent: i64,
    pub is_limiting: bool,
    pub utilization_pct: f64,
}

/// HA Admission Control reserve compared against N-1 host tolerance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintAnalysis {
    pub ha_admission: CapacityConstraint,
    pub n_minus_x: CapacityConstraint,
    pub limiting_constraint: ConstraintKind,
    pub limiting_label: String,
    pub insufficient_ha_warning: bool,
}

/// Full comparison response for a scenario request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub current: ScenarioResult,
    pub proposed: ScenarioResult,
    pub warnings: Vec<ScenarioWarning>,
    pub delta: ScenarioDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintAnalysis>,
}
