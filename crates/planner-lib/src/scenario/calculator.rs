//! Scenario computation and comparison
//!
//! Derives capacity, utilization, resilience, CPU and throughput
//! metrics for the environment as it stands and for a proposed cell
//! geometry, then assembles the comparison document with warnings,
//! deltas and constraint analysis.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{validate, ScenarioError};
use crate::models::{
    ConstraintKind, CpuRiskLevel, InfrastructureState, ResilienceChange, ResourceDimension,
    ScenarioComparison, ScenarioDelta, ScenarioInput, ScenarioResult, Severity,
};

use super::bottleneck::{classify_bottleneck, max_cells_by_disk, max_cells_by_memory};
use super::changes::detect_changes;
use super::chunk::{free_chunks, resolve_chunk_size_mb};
use super::constraints::calculate_constraints;
use super::cpu::{classify_cpu_risk, max_cells_by_cpu};
use super::curve::estimate_tps;
use super::warnings::{generate_warnings, insufficient_ha_warning, WarningsContext};
use super::{dimension_selected, DEFAULT_OVERHEAD_PCT, DISK_OVERHEAD_PCT};

/// Stateless calculator for what-if capacity scenarios
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioCalculator;

/// Geometry and workload for one scenario computation
struct CellScenario {
    cell_count: i64,
    cell_memory_gb: i64,
    cell_cpu: i64,
    cell_disk_gb: i64,
    workload_memory_gb: i64,
    workload_disk_gb: i64,
    workload_instances: i64,
    overhead_pct: f64,
}

impl ScenarioCalculator {
    pub fn new() -> Self {
        ScenarioCalculator
    }

    /// Metrics for the environment as it stands, computed under the
    /// same lens (chunk override, curve, host topology) as the proposal
    /// so the two results compare like for like. Overhead is the
    /// exception: the running environment is always described at the
    /// default 7%; the input's override shapes only the proposal.
    pub fn current(&self, state: &InfrastructureState, input: &ScenarioInput) -> ScenarioResult {
        let (cell_memory_gb, cell_cpu, cell_disk_gb) = baseline_cell_geometry(state);
        let spec = CellScenario {
            cell_count: state.total_cell_count,
            cell_memory_gb,
            cell_cpu,
            cell_disk_gb,
            workload_memory_gb: state.total_app_memory_gb,
            workload_disk_gb: state.total_app_disk_gb,
            workload_instances: state.total_app_instances,
            overhead_pct: DEFAULT_OVERHEAD_PCT,
        };
        self.calculate(state, input, &spec)
    }

    /// Metrics for the proposed cell geometry, with any additional app
    /// folded into the workload before anything is computed.
    pub fn proposed(&self, state: &InfrastructureState, input: &ScenarioInput) -> ScenarioResult {
        let mut workload_memory_gb = state.total_app_memory_gb;
        let mut workload_disk_gb = state.total_app_disk_gb;
        let mut workload_instances = state.total_app_instances;
        if let Some(app) = &input.additional_app {
            workload_memory_gb += app.instances * app.memory_gb;
            workload_disk_gb += app.instances * app.disk_gb;
            workload_instances += app.instances;
        }

        let overhead_pct = if input.overhead_pct > 0.0 {
            input.overhead_pct
        } else {
            DEFAULT_OVERHEAD_PCT
        };

        let spec = CellScenario {
            cell_count: input.proposed_cell_count,
            cell_memory_gb: input.proposed_cell_memory_gb,
            cell_cpu: input.proposed_cell_cpu,
            cell_disk_gb: input.proposed_cell_disk_gb,
            workload_memory_gb,
            workload_disk_gb,
            workload_instances,
            overhead_pct,
        };
        self.calculate(state, input, &spec)
    }

    /// Runs the full comparison: both scenarios, constraint analysis,
    /// change detection, warnings sorted critical-first, and deltas.
    pub fn compare(
        &self,
        state: &InfrastructureState,
        input: &ScenarioInput,
    ) -> Result<ScenarioComparison, ScenarioError> {
        validate(input)?;

        let current = self.current(state, input);
        let proposed = self.proposed(state, input);

        let constraints = calculate_constraints(
            input.host_count * input.memory_per_host_gb,
            input.host_count,
            input.memory_per_host_gb,
            input.ha_admission_pct,
            input.proposed_cell_count * input.proposed_cell_memory_gb + state.platform_vms_gb,
        );

        let changes = detect_changes(state, input);
        let ctx = WarningsContext {
            state,
            input,
            changes: &changes,
        };
        let mut warnings = generate_warnings(&current, &proposed, constraints.as_ref(), &ctx);

        if let Some(analysis) = &constraints {
            if analysis.insufficient_ha_warning
                && dimension_selected(&input.selected_resources, ResourceDimension::Memory)
            {
                warnings.push(insufficient_ha_warning(analysis));
            }
        }
        warnings.sort_by_key(|w| match w.severity {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        });

        let delta = ScenarioDelta {
            capacity_change_gb: proposed.app_capacity_gb - current.app_capacity_gb,
            disk_capacity_change_gb: proposed.disk_capacity_gb - current.disk_capacity_gb,
            utilization_change_pct: proposed.utilization_pct - current.utilization_pct,
            disk_utilization_change_pct: proposed.disk_utilization_pct
                - current.disk_utilization_pct,
            vcpu_ratio_change: proposed.vcpu_ratio - current.vcpu_ratio,
            resilience_change: resilience_change(current.cell_count, proposed.cell_count),
        };

        debug!(
            current = %current.cell_size(),
            proposed = %proposed.cell_size(),
            warnings = warnings.len(),
            "scenario comparison complete"
        );

        Ok(ScenarioComparison {
            current,
            proposed,
            warnings,
            delta,
            constraints,
        })
    }

    fn calculate(
        &self,
        state: &InfrastructureState,
        input: &ScenarioInput,
        spec: &CellScenario,
    ) -> ScenarioResult {
        let app_capacity_gb = spec.cell_count as f64
            * spec.cell_memory_gb as f64
            * (1.0 - spec.overhead_pct / 100.0);
        let disk_capacity_gb = if spec.cell_disk_gb > 0 {
            spec.cell_count as f64
                * spec.cell_disk_gb as f64
                * (1.0 - DISK_OVERHEAD_PCT / 100.0)
        } else {
            0.0
        };

        let utilization_pct = ratio_pct(spec.workload_memory_gb as f64, app_capacity_gb);
        let disk_utilization_pct = ratio_pct(spec.workload_disk_gb as f64, disk_capacity_gb);

        let n1_utilization_pct = if state.total_n1_memory_gb > 0 {
            (spec.cell_count * spec.cell_memory_gb + state.platform_vms_gb) as f64
                / state.total_n1_memory_gb as f64
                * 100.0
        } else {
            0.0
        };

        let chunk_size_mb = resolve_chunk_size_mb(input.chunk_size_mb, state.max_instance_memory_mb);
        let free_chunks = free_chunks(app_capacity_gb, spec.workload_memory_gb as f64, chunk_size_mb);

        let (instances_per_cell, fault_impact) = if spec.cell_count > 0 {
            let per_cell = spec.workload_instances as f64 / spec.cell_count as f64;
            (per_cell, per_cell.round() as i64)
        } else {
            (0.0, 0)
        };

        // CPU analysis runs only when the request carries host topology
        let cpu_enabled = input.host_count > 0 && input.physical_cores_per_host > 0;
        let (total_vcpus, total_pcpus, vcpu_ratio, cpu_risk_level) = if cpu_enabled {
            let vcpus = spec.cell_count * spec.cell_cpu;
            let pcpus = input.host_count * input.physical_cores_per_host;
            let ratio = if pcpus > 0 {
                vcpus as f64 / pcpus as f64
            } else {
                0.0
            };
            (vcpus, pcpus, ratio, classify_cpu_risk(ratio))
        } else {
            (0, 0, 0.0, CpuRiskLevel::Unknown)
        };

        let (max_cells_cpu, cpu_headroom_cells) = if cpu_enabled && input.target_vcpu_ratio > 0.0 {
            let max = max_cells_by_cpu(
                input.target_vcpu_ratio,
                total_pcpus,
                spec.cell_cpu,
                input.platform_vcpus,
            );
            (max, max - spec.cell_count)
        } else {
            (0, 0)
        };

        let (estimated_tps, tps_status) = estimate_tps(spec.cell_count, &input.tps_curve);

        // deployable maxima; memory is always evaluated, CPU and disk
        // only with their prerequisites in place
        let selected = input.selected_resources.as_slice();
        let max_cells_memory = max_cells_by_memory(
            limiting_usable_gb(state, input),
            state.platform_vms_gb,
            spec.cell_memory_gb,
        );
        let mut maxima = vec![(ResourceDimension::Memory, max_cells_memory)];

        if dimension_selected(selected, ResourceDimension::Cpu)
            && cpu_enabled
            && input.target_vcpu_ratio > 0.0
        {
            maxima.push((ResourceDimension::Cpu, max_cells_cpu));
        }

        let disk_pool_gb = provisioned_disk_pool_gb(state);
        let disk_evaluated = dimension_selected(selected, ResourceDimension::Disk)
            && disk_pool_gb > 0
            && spec.cell_disk_gb > 0;
        let max_cells_disk = if disk_evaluated {
            max_cells_by_disk(disk_pool_gb, spec.cell_disk_gb)
        } else {
            0
        };
        if disk_evaluated {
            maxima.push((ResourceDimension::Disk, max_cells_disk));
        }

        let bottleneck = classify_bottleneck(&maxima);

        ScenarioResult {
            cell_count: spec.cell_count,
            cell_memory_gb: spec.cell_memory_gb,
            cell_cpu: spec.cell_cpu,
            cell_disk_gb: spec.cell_disk_gb,
            app_capacity_gb,
            disk_capacity_gb,
            utilization_pct,
            disk_utilization_pct,
            free_chunks,
            chunk_size_mb,
            n1_utilization_pct,
            fault_impact,
            instances_per_cell,
            total_vcpus,
            total_pcpus,
            vcpu_ratio,
            cpu_risk_level,
            max_cells_by_memory: max_cells_memory,
            max_cells_by_cpu: max_cells_cpu,
            max_cells_by_disk: max_cells_disk,
            cpu_headroom_cells,
            bottleneck,
            estimated_tps,
            tps_status,
        }
    }
}

/// Cell geometry of the first cluster actually running cells.
pub(crate) fn baseline_cell_geometry(state: &InfrastructureState) -> (i64, i64, i64) {
    state
        .clusters
        .iter()
        .find(|c| c.cell_memory_gb > 0)
        .map(|c| (c.cell_memory_gb, c.cell_cpu, c.cell_disk_gb))
        .unwrap_or((0, 0, 0))
}

/// Usable memory under whichever reserve policy limits, falling back
/// to the snapshot N-1 capacity without host topology in the request.
fn limiting_usable_gb(state: &InfrastructureState, input: &ScenarioInput) -> i64 {
    match calculate_constraints(
        input.host_count * input.memory_per_host_gb,
        input.host_count,
        input.memory_per_host_gb,
        input.ha_admission_pct,
        0,
    ) {
        Some(c) if c.limiting_constraint == ConstraintKind::HaAdmission => c.ha_admission.usable_gb,
        Some(c) => c.n_minus_x.usable_gb,
        None => state.total_n1_memory_gb,
    }
}

fn provisioned_disk_pool_gb(state: &InfrastructureState) -> i64 {
    state
        .clusters
        .iter()
        .map(|c| c.cell_count * c.cell_disk_gb)
        .sum()
}

fn ratio_pct(used: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        used / capacity * 100.0
    } else {
        0.0
    }
}

fn resilience_change(current_cells: i64, proposed_cells: i64) -> ResilienceChange {
    match proposed_cells.cmp(&current_cells) {
        Ordering::Greater => ResilienceChange::Improved,
        Ordering::Less => ResilienceChange::Reduced,
        Ordering::Equal => ResilienceChange::Unchanged,
    }
}
