//! Capacity scenario engine
//!
//! Everything needed to compare a proposed cell geometry against the
//! running environment:
//! - [`ScenarioCalculator`] computes per-scenario metrics and the full
//!   comparison document
//! - chunk, curve, CPU, constraint and bottleneck helpers cover the
//!   individual analyses
//! - warning generation and change detection annotate the comparison

mod bottleneck;
mod calculator;
mod changes;
mod chunk;
mod constraints;
mod cpu;
mod curve;
mod warnings;

pub use bottleneck::{classify_bottleneck, max_cells_by_disk, max_cells_by_memory};
pub use calculator::ScenarioCalculator;
pub use changes::detect_changes;
pub use chunk::{free_chunks, resolve_chunk_size_mb};
pub use constraints::calculate_constraints;
pub use cpu::{classify_cpu_risk, cpu_ratio_fixes, max_cells_by_cpu};
pub use curve::{default_tps_curve, estimate_tps};
pub use warnings::{generate_warnings, WarningsContext};

use crate::models::ResourceDimension;

/// Memory overhead percent assumed when the request does not set one
pub const DEFAULT_OVERHEAD_PCT: f64 = 7.0;
/// Disk formatting overhead percent
pub const DISK_OVERHEAD_PCT: f64 = 0.01;
/// Staging chunk size assumed without an override or workload data
pub const DEFAULT_CHUNK_SIZE_MB: i64 = 4096;
/// Floor applied to chunk sizes inferred from instance memory
pub const MIN_INFERRED_CHUNK_MB: i64 = 1024;
/// Margin utilization above which capacity is critical
pub const N1_CRITICAL_PCT: f64 = 85.0;
/// Margin utilization above which capacity is a warning
pub const N1_WARNING_PCT: f64 = 75.0;
/// Cell or disk utilization above which usage is critical
pub const UTILIZATION_CRITICAL_PCT: f64 = 90.0;
/// Cell or disk utilization above which usage is elevated
pub const UTILIZATION_WARNING_PCT: f64 = 80.0;
/// Free staging chunks below which staging capacity is critical
pub const FREE_CHUNKS_CRITICAL: i64 = 200;
/// Free staging chunks below which staging capacity is a warning
pub const FREE_CHUNKS_WARNING: i64 = 400;
/// Cell count reduction percent that flags a redundancy loss
pub const REDUNDANCY_REDUCTION_PCT: f64 = 50.0;
/// Upper bound of the conservative vCPU:pCPU band
pub const CPU_RATIO_CONSERVATIVE_MAX: f64 = 4.0;
/// Upper bound of the moderate vCPU:pCPU band
pub const CPU_RATIO_MODERATE_MAX: f64 = 8.0;
/// Share of usable memory considered safe to commit
pub const SAFE_TARGET_FRACTION: f64 = 0.84;

/// True when the dimension participates in analysis. An empty
/// selection selects every dimension.
pub fn dimension_selected(selected: &[ResourceDimension], dimension: ResourceDimension) -> bool {
    selected.is_empty() || selected.contains(&dimension)
}
