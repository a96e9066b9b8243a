//! Input validation for scenario requests
//!
//! Structural problems (negative geometry, out-of-range percentages,
//! unusable curves) are rejected before any computation. Degenerate but
//! well-formed inputs (zero counts, zero denominators) are not errors;
//! the calculator yields defined zero values for those.

use thiserror::Error;

use crate::models::{ResourceDimension, ScenarioInput};

/// Validation failures for a scenario request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("proposed_cell_count must not be negative, got {0}")]
    NegativeCellCount(i64),

    #[error("proposed_cell_memory_gb must not be negative, got {0}")]
    NegativeCellMemory(i64),

    #[error("proposed_cell_cpu must not be negative, got {0}")]
    NegativeCellCpu(i64),

    #[error("proposed_cell_disk_gb must not be negative, got {0}")]
    NegativeCellDisk(i64),

    #[error("overhead_pct must be within 0..=100, got {0}")]
    OverheadOutOfRange(f64),

    #[error("ha_admission_pct must be within 0..=100, got {0}")]
    HaAdmissionOutOfRange(f64),

    #[error("chunk_size_mb must not be negative, got {0}")]
    NegativeChunkSize(i64),

    #[error("host configuration values must not be negative")]
    NegativeHostConfig,

    #[error("target_vcpu_ratio must not be negative, got {0}")]
    NegativeTargetRatio(f64),

    #[error("tps_curve needs at least two points")]
    CurveTooShort,

    #[error("tps_curve points need cells >= 1 and tps >= 0")]
    InvalidCurvePoint,

    #[error("additional_app values must not be negative")]
    NegativeAppSpec,

    #[error("selected resource '{0}' requires a per-cell resource greater than zero")]
    MissingDimensionPrerequisite(ResourceDimension),
}

/// Checks a scenario request for structural validity.
pub fn validate(input: &ScenarioInput) -> Result<(), ScenarioError> {
    if input.proposed_cell_count < 0 {
        return Err(ScenarioError::NegativeCellCount(input.proposed_cell_count));
    }
    if input.proposed_cell_memory_gb < 0 {
        return Err(ScenarioError::NegativeCellMemory(
            input.proposed_cell_memory_gb,
        ));
    }
    if input.proposed_cell_cpu < 0 {
        return Err(ScenarioError::NegativeCellCpu(input.proposed_cell_cpu));
    }
    if input.proposed_cell_disk_gb < 0 {
        return Err(ScenarioError::NegativeCellDisk(input.proposed_cell_disk_gb));
    }
    if !(0.0..=100.0).contains(&input.overhead_pct) {
        return Err(ScenarioError::OverheadOutOfRange(input.overhead_pct));
    }
    if !(0.0..=100.0).contains(&input.ha_admission_pct) {
        return Err(ScenarioError::HaAdmissionOutOfRange(input.ha_admission_pct));
    }
    if input.chunk_size_mb < 0 {
        return Err(ScenarioError::NegativeChunkSize(input.chunk_size_mb));
    }
    if input.host_count < 0
        || input.physical_cores_per_host < 0
        || input.memory_per_host_gb < 0
        || input.platform_vcpus < 0
    {
        return Err(ScenarioError::NegativeHostConfig);
    }
    if input.target_vcpu_ratio < 0.0 {
        return Err(ScenarioError::NegativeTargetRatio(input.target_vcpu_ratio));
    }
    if input.tps_curve.len() == 1 {
        return Err(ScenarioError::CurveTooShort);
    }
    if input.tps_curve.iter().any(|p| p.cells < 1 || p.tps < 0) {
        return Err(ScenarioError::InvalidCurvePoint);
    }
    if let Some(app) = &input.additional_app {
        if app.instances < 0 || app.memory_gb < 0 || app.disk_gb < 0 {
            return Err(ScenarioError::NegativeAppSpec);
        }
    }
    for dim in &input.selected_resources {
        match dim {
            ResourceDimension::Cpu if input.proposed_cell_cpu == 0 => {
                return Err(ScenarioError::MissingDimensionPrerequisite(*dim));
            }
            ResourceDimension::Disk if input.proposed_cell_disk_gb == 0 => {
                return Err(ScenarioError::MissingDimensionPrerequisite(*dim));
            }
            _ => {}
        }
    }
    Ok(())
}
