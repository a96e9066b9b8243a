//! vCPU:pCPU overcommit analysis
//!
//! Classifies overcommit ratios, computes the CPU-bound deployable
//! maximum, and suggests reductions that bring an overshooting ratio
//! back under its target.

use crate::models::{CpuRiskLevel, FixSuggestion};

use super::{CPU_RATIO_CONSERVATIVE_MAX, CPU_RATIO_MODERATE_MAX};

/// Classifies a vCPU:pCPU ratio. Both boundaries are inclusive on the
/// safer side: exactly 4:1 is conservative, exactly 8:1 is moderate.
pub fn classify_cpu_risk(ratio: f64) -> CpuRiskLevel {
    if ratio <= CPU_RATIO_CONSERVATIVE_MAX {
        CpuRiskLevel::Conservative
    } else if ratio <= CPU_RATIO_MODERATE_MAX {
        CpuRiskLevel::Moderate
    } else {
        CpuRiskLevel::Aggressive
    }
}

/// Maximum cells deployable under a target overcommit ratio.
///
/// Platform VM vCPUs come out of the budget after the target ratio is
/// applied to the physical cores.
pub fn max_cells_by_cpu(
    target_ratio: f64,
    total_pcpus: i64,
    cell_cpu: i64,
    platform_vcpus: i64,
) -> i64 {
    if cell_cpu <= 0 || total_pcpus <= 0 {
        return 0;
    }
    let budget = target_ratio * total_pcpus as f64 - platform_vcpus as f64;
    if budget <= 0.0 {
        return 0;
    }
    (budget / cell_cpu as f64).floor() as i64
}

/// Suggestions that bring an overcommitted ratio back to target: fewer
/// cells, or fewer vCPUs per cell. Only actual reductions are emitted.
pub fn cpu_ratio_fixes(
    target_ratio: f64,
    total_pcpus: i64,
    cell_count: i64,
    cell_cpu: i64,
) -> Vec<FixSuggestion> {
    let mut fixes = Vec::new();
    if target_ratio <= 0.0 || total_pcpus <= 0 {
        return fixes;
    }
    let vcpu_budget = target_ratio * total_pcpus as f64;

    if cell_cpu > 0 {
        let target_count = (vcpu_budget / cell_cpu as f64).floor() as i64;
        if target_count > 0 && target_count < cell_count {
            fixes.push(FixSuggestion::CellCount {
                value: target_count,
            });
        }
    }
    if cell_count > 0 {
        let target_cpu = (vcpu_budget / cell_count as f64).floor() as i64;
        if target_cpu > 0 && target_cpu < cell_cpu {
            fixes.push(FixSuggestion::CellCpu { value: target_cpu });
        }
    }
    fixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_boundaries_inclusive_on_safer_side() {
        assert_eq!(classify_cpu_risk(0.0), CpuRiskLevel::Conservative);
        assert_eq!(classify_cpu_risk(4.0), CpuRiskLevel::Conservative);
        assert_eq!(classify_cpu_risk(4.1), CpuRiskLevel::Moderate);
        assert_eq!(classify_cpu_risk(8.0), CpuRiskLevel::Moderate);
        assert_eq!(classify_cpu_risk(8.1), CpuRiskLevel::Aggressive);
    }

    #[test]
    fn test_max_cells_by_cpu() {
        assert_eq!(max_cells_by_cpu(4.0, 100, 4, 0), 100);
        assert_eq!(max_cells_by_cpu(4.0, 100, 4, 40), 90);
        assert_eq!(max_cells_by_cpu(4.0, 96, 4, 24), 90);
    }

    #[test]
    fn test_max_cells_zero_when_platform_exhausts_budget() {
        assert_eq!(max_cells_by_cpu(4.0, 100, 4, 500), 0);
    }

    #[test]
    fn test_max_cells_degenerate_inputs() {
        assert_eq!(max_cells_by_cpu(4.0, 0, 4, 0), 0);
        assert_eq!(max_cells_by_cpu(4.0, 100, 0, 0), 0);
        assert_eq!(max_cells_by_cpu(0.0, 100, 4, 0), 0);
    }

    #[test]
    fn test_ratio_fixes_reduce_count_and_cpu() {
        // 50 cells x 8 vCPU on 96 pCPUs, target 4:1
        let fixes = cpu_ratio_fixes(4.0, 96, 50, 8);
        assert_eq!(
            fixes,
            vec![
                FixSuggestion::CellCount { value: 48 },
                FixSuggestion::CellCpu { value: 7 },
            ]
        );
    }

    #[test]
    fn test_ratio_fixes_empty_when_under_target() {
        let fixes = cpu_ratio_fixes(8.0, 96, 10, 4);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_ratio_fixes_skip_zero_suggestions() {
        // budget too small for even one 8-vCPU cell
        let fixes = cpu_ratio_fixes(1.0, 4, 3, 8);
        assert_eq!(fixes, vec![FixSuggestion::CellCpu { value: 1 }]);
    }

    #[test]
    fn test_ratio_fixes_without_host_data() {
        assert!(cpu_ratio_fixes(4.0, 0, 50, 8).is_empty());
    }
}
