//! Tradeoff warnings and fix suggestions
//!
//! Evaluates the proposed scenario against capacity, staging,
//! utilization, redundancy, CPU and throughput thresholds. Warnings
//! carry the configuration change that triggered them and concrete
//! fixes where one can be computed.

use crate::models::{
    ConfigChange, ConstraintAnalysis, ConstraintKind, FixSuggestion, InfrastructureState,
    ResourceDimension, ScenarioInput, ScenarioResult, ScenarioWarning, Severity, ThroughputStatus,
};

use super::bottleneck::max_cells_by_memory;
use super::changes::change_for;
use super::cpu::cpu_ratio_fixes;
use super::{
    dimension_selected, CPU_RATIO_MODERATE_MAX, FREE_CHUNKS_CRITICAL, FREE_CHUNKS_WARNING,
    N1_CRITICAL_PCT, N1_WARNING_PCT, REDUNDANCY_REDUCTION_PCT, SAFE_TARGET_FRACTION,
    UTILIZATION_CRITICAL_PCT, UTILIZATION_WARNING_PCT,
};

/// Inputs the warning generator needs beyond the two results
pub struct WarningsContext<'a> {
    pub state: &'a InfrastructureState,
    pub input: &'a ScenarioInput,
    pub changes: &'a [ConfigChange],
}

/// Evaluates all warning rules for the proposed scenario, filtered to
/// the selected resource dimensions. Throughput warnings are never
/// filtered. Output is in evaluation order; the comparison sorts
/// critical-first before returning.
pub fn generate_warnings(
    current: &ScenarioResult,
    proposed: &ScenarioResult,
    constraints: Option<&ConstraintAnalysis>,
    ctx: &WarningsContext<'_>,
) -> Vec<ScenarioWarning> {
    let mut warnings = Vec::new();
    let selected = ctx.input.selected_resources.as_slice();

    if dimension_selected(selected, ResourceDimension::Memory) {
        capacity_margin_warning(&mut warnings, proposed, constraints, ctx);
        staging_warning(&mut warnings, proposed);
        cell_utilization_warning(&mut warnings, proposed);
        redundancy_warning(&mut warnings, current, proposed, ctx);
    }
    if dimension_selected(selected, ResourceDimension::Disk) {
        disk_utilization_warning(&mut warnings, proposed);
    }
    if dimension_selected(selected, ResourceDimension::Cpu) {
        cpu_warnings(&mut warnings, proposed, ctx);
    }
    throughput_warning(&mut warnings, proposed);

    warnings
}

/// Warning appended when the HA admission reserve cannot absorb even
/// one host failure.
pub fn insufficient_ha_warning(analysis: &ConstraintAnalysis) -> ScenarioWarning {
    ScenarioWarning {
        severity: Severity::Warning,
        message: format!(
            "HA Admission Control reserve ({} GB) is insufficient for a single host failure ({} GB needed)",
            analysis.ha_admission.reserved_gb, analysis.n_minus_x.reserved_gb
        ),
        change: None,
        fixes: Vec::new(),
    }
}

/// The limiting constraint's utilization drives the margin check when
/// host topology was supplied; the snapshot N-1 utilization otherwise.
fn capacity_margin_warning(
    warnings: &mut Vec<ScenarioWarning>,
    proposed: &ScenarioResult,
    constraints: Option<&ConstraintAnalysis>,
    ctx: &WarningsContext<'_>,
) {
    let (margin_pct, ha_label) = match constraints {
        Some(c) if c.limiting_constraint == ConstraintKind::HaAdmission => {
            (c.ha_admission.utilization_pct, Some(c.limiting_label.clone()))
        }
        Some(c) => (c.n_minus_x.utilization_pct, None),
        None => (proposed.n1_utilization_pct, None),
    };

    let (severity, message) = if margin_pct > N1_CRITICAL_PCT {
        match &ha_label {
            Some(label) => (
                Severity::Critical,
                format!("Exceeds HA Admission Control capacity ({label})"),
            ),
            None => (
                Severity::Critical,
                "Exceeds N-1 capacity safety margin".to_string(),
            ),
        }
    } else if margin_pct > N1_WARNING_PCT {
        match &ha_label {
            Some(label) => (
                Severity::Warning,
                format!("Approaching HA Admission Control capacity ({label})"),
            ),
            None => (
                Severity::Warning,
                "Approaching N-1 capacity limits".to_string(),
            ),
        }
    } else {
        return;
    };

    warnings.push(ScenarioWarning {
        severity,
        message,
        change: None,
        fixes: capacity_fixes(constraints, ctx),
    });
}

/// Fixes for a breached capacity margin: fewer cells within the
/// limiting usable capacity, or more hosts to fit the proposal.
fn capacity_fixes(
    constraints: Option<&ConstraintAnalysis>,
    ctx: &WarningsContext<'_>,
) -> Vec<FixSuggestion> {
    let mut fixes = Vec::new();
    let input = ctx.input;

    let limiting_usable_gb = match constraints {
        Some(c) if c.limiting_constraint == ConstraintKind::HaAdmission => c.ha_admission.usable_gb,
        Some(c) => c.n_minus_x.usable_gb,
        None => ctx.state.total_n1_memory_gb,
    };

    if input.proposed_cell_memory_gb > 0 {
        let target_count = max_cells_by_memory(
            limiting_usable_gb,
            ctx.state.platform_vms_gb,
            input.proposed_cell_memory_gb,
        );
        if target_count > 0 && target_count < input.proposed_cell_count {
            fixes.push(FixSuggestion::CellCount {
                value: target_count,
            });
        }
    }
    if input.memory_per_host_gb > 0 {
        let needed_gb = (input.proposed_cell_count * input.proposed_cell_memory_gb
            + ctx.state.platform_vms_gb) as f64
            / SAFE_TARGET_FRACTION;
        let hosts = (needed_gb / input.memory_per_host_gb as f64).ceil() as i64 + 1;
        if hosts > input.host_count {
            fixes.push(FixSuggestion::HostCount { value: hosts });
        }
    }
    fixes
}

fn staging_warning(warnings: &mut Vec<ScenarioWarning>, proposed: &ScenarioResult) {
    if proposed.free_chunks < FREE_CHUNKS_CRITICAL {
        push_plain(warnings, Severity::Critical, "Critical: Low staging capacity");
    } else if proposed.free_chunks < FREE_CHUNKS_WARNING {
        push_plain(warnings, Severity::Warning, "Low staging capacity");
    }
}

fn cell_utilization_warning(warnings: &mut Vec<ScenarioWarning>, proposed: &ScenarioResult) {
    if proposed.utilization_pct > UTILIZATION_CRITICAL_PCT {
        push_plain(warnings, Severity::Critical, "Cell utilization critically high");
    } else if proposed.utilization_pct > UTILIZATION_WARNING_PCT {
        push_plain(warnings, Severity::Warning, "Cell utilization elevated");
    }
}

fn disk_utilization_warning(warnings: &mut Vec<ScenarioWarning>, proposed: &ScenarioResult) {
    if proposed.disk_utilization_pct > UTILIZATION_CRITICAL_PCT {
        push_plain(warnings, Severity::Critical, "Disk utilization critically high");
    } else if proposed.disk_utilization_pct > UTILIZATION_WARNING_PCT {
        push_plain(warnings, Severity::Warning, "Disk utilization elevated");
    }
}

fn redundancy_warning(
    warnings: &mut Vec<ScenarioWarning>,
    current: &ScenarioResult,
    proposed: &ScenarioResult,
    ctx: &WarningsContext<'_>,
) {
    if current.cell_count <= 0 {
        return;
    }
    let reduction_pct =
        (current.cell_count - proposed.cell_count) as f64 / current.cell_count as f64 * 100.0;
    if reduction_pct < REDUNDANCY_REDUCTION_PCT {
        return;
    }
    warnings.push(ScenarioWarning {
        severity: Severity::Warning,
        message: format!(
            "Significant redundancy reduction: cell count drops {:.0}%",
            reduction_pct
        ),
        change: change_for(ctx.changes, "cell_count"),
        fixes: Vec::new(),
    });
}

fn cpu_warnings(
    warnings: &mut Vec<ScenarioWarning>,
    proposed: &ScenarioResult,
    ctx: &WarningsContext<'_>,
) {
    if proposed.total_pcpus <= 0 {
        return;
    }
    let input = ctx.input;

    if input.target_vcpu_ratio > 0.0 && proposed.vcpu_ratio > input.target_vcpu_ratio {
        warnings.push(ScenarioWarning {
            severity: Severity::Warning,
            message: format!(
                "vCPU:pCPU ratio {:.2}:1 exceeds target {:.1}:1",
                proposed.vcpu_ratio, input.target_vcpu_ratio
            ),
            change: change_for(ctx.changes, "cell_cpu"),
            fixes: cpu_ratio_fixes(
                input.target_vcpu_ratio,
                proposed.total_pcpus,
                proposed.cell_count,
                proposed.cell_cpu,
            ),
        });
    }
    if proposed.vcpu_ratio > CPU_RATIO_MODERATE_MAX {
        push_plain(
            warnings,
            Severity::Critical,
            &format!(
                "vCPU:pCPU ratio {:.2}:1 is aggressive and risks CPU contention",
                proposed.vcpu_ratio
            ),
        );
    }
}

fn throughput_warning(warnings: &mut Vec<ScenarioWarning>, proposed: &ScenarioResult) {
    match proposed.tps_status {
        ThroughputStatus::Critical => push_plain(
            warnings,
            Severity::Critical,
            &format!(
                "Cell count ({}) causes severe scheduling degradation (~{} TPS)",
                proposed.cell_count, proposed.estimated_tps
            ),
        ),
        ThroughputStatus::Degraded => push_plain(
            warnings,
            Severity::Warning,
            &format!(
                "Cell count ({}) may cause scheduling latency (~{} TPS)",
                proposed.cell_count, proposed.estimated_tps
            ),
        ),
        _ => {}
    }
}

fn push_plain(warnings: &mut Vec<ScenarioWarning>, severity: Severity, message: &str) {
    warnings.push(ScenarioWarning {
        severity,
        message: message.to_string(),
        change: None,
        fixes: Vec::new(),
    });
}
