//! Reserve policy analysis
//!
//! Compares two capacity reserve policies over the same host pool:
//! percentage-based HA Admission Control and a flat one-host (N-1)
//! tolerance. Whichever leaves less usable memory is the limiting
//! constraint for the scenario.

use crate::models::{CapacityConstraint, ConstraintAnalysis, ConstraintKind};

/// Analyzes HA admission and N-1 reserves for the given host pool.
///
/// Returns `None` without host data; the caller falls back to plain
/// N-1 margin checks against the snapshot in that case.
pub fn calculate_constraints(
    total_memory_gb: i64,
    host_count: i64,
    memory_per_host_gb: i64,
    ha_admission_pct: f64,
    used_memory_gb: i64,
) -> Option<ConstraintAnalysis> {
    if host_count <= 0 || total_memory_gb <= 0 {
        return None;
    }

    let ha_reserved = (total_memory_gb as f64 * ha_admission_pct / 100.0) as i64;
    let ha_usable = total_memory_gb - ha_reserved;
    let n_equivalent = if memory_per_host_gb > 0 {
        ha_reserved / memory_per_host_gb
    } else {
        0
    };

    let n1_reserved = memory_per_host_gb;
    let n1_usable = total_memory_gb - n1_reserved;

    let mut ha_admission = CapacityConstraint {
        kind: ConstraintKind::HaAdmission,
        reserved_gb: ha_reserved,
        reserved_pct: share_pct(ha_reserved, total_memory_gb),
        usable_gb: ha_usable,
        n_equivalent,
        is_limiting: false,
        utilization_pct: utilization_pct(used_memory_gb, ha_usable),
    };
    let mut n_minus_x = CapacityConstraint {
        kind: ConstraintKind::NMinusX,
        reserved_gb: n1_reserved,
        reserved_pct: share_pct(n1_reserved, total_memory_gb),
        usable_gb: n1_usable,
        n_equivalent: 1,
        is_limiting: false,
        utilization_pct: utilization_pct(used_memory_gb, n1_usable),
    };

    // ties go to HA admission: it is the policy the operator dialed in
    let (limiting_constraint, limiting_label) = if ha_usable <= n1_usable {
        ha_admission.is_limiting = true;
        (
            ConstraintKind::HaAdmission,
            format!("HA {}% (≈N-{})", ha_admission_pct, n_equivalent),
        )
    } else {
        n_minus_x.is_limiting = true;
        (ConstraintKind::NMinusX, "N-1".to_string())
    };

    let insufficient_ha_warning = ha_reserved < n1_reserved;

    Some(ConstraintAnalysis {
        ha_admission,
        n_minus_x,
        limiting_constraint,
        limiting_label,
        insufficient_ha_warning,
    })
}

fn share_pct(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

fn utilization_pct(used: i64, usable: i64) -> f64 {
    if usable > 0 {
        used as f64 / usable as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ha_reserve_limits_before_n1() {
        // 15 hosts x 2048 GB with 25% HA admission
        let analysis = calculate_constraints(30_720, 15, 2048, 25.0, 21_800)
            .unwrap();

        assert_eq!(analysis.ha_admission.reserved_gb, 7680);
        assert_eq!(analysis.ha_admission.usable_gb, 23_040);
        assert_eq!(analysis.ha_admission.n_equivalent, 3);
        assert_eq!(analysis.n_minus_x.reserved_gb, 2048);
        assert_eq!(analysis.n_minus_x.usable_gb, 28_672);

        assert_eq!(analysis.limiting_constraint, ConstraintKind::HaAdmission);
        assert_eq!(analysis.limiting_label, "HA 25% (≈N-3)");
        assert!(analysis.ha_admission.is_limiting);
        assert!(!analysis.n_minus_x.is_limiting);
        assert!(!analysis.insufficient_ha_warning);

        let utilization = analysis.ha_admission.utilization_pct;
        assert!((utilization - 94.618).abs() < 0.01);
    }

    #[test]
    fn test_low_ha_percentage_is_insufficient_for_n1() {
        let analysis = calculate_constraints(30_720, 15, 2048, 5.0, 0).unwrap();

        // 1536 GB reserve covers less than one 2048 GB host
        assert_eq!(analysis.ha_admission.reserved_gb, 1536);
        assert_eq!(analysis.ha_admission.n_equivalent, 0);
        assert!(analysis.insufficient_ha_warning);
        assert_eq!(analysis.limiting_constraint, ConstraintKind::NMinusX);
        assert_eq!(analysis.limiting_label, "N-1");
    }

    #[test]
    fn test_zero_ha_percentage() {
        let analysis = calculate_constraints(30_720, 15, 2048, 0.0, 0).unwrap();

        assert_eq!(analysis.ha_admission.reserved_gb, 0);
        assert_eq!(analysis.ha_admission.usable_gb, 30_720);
        assert!(analysis.insufficient_ha_warning);
        assert_eq!(analysis.limiting_constraint, ConstraintKind::NMinusX);
    }

    #[test]
    fn test_equal_usable_ties_to_ha() {
        // 10% of 20480 equals one 2048 GB host exactly
        let analysis = calculate_constraints(20_480, 10, 2048, 10.0, 0).unwrap();

        assert_eq!(analysis.ha_admission.usable_gb, analysis.n_minus_x.usable_gb);
        assert_eq!(analysis.limiting_constraint, ConstraintKind::HaAdmission);
        assert_eq!(analysis.limiting_label, "HA 10% (≈N-1)");
        assert!(!analysis.insufficient_ha_warning);
    }

    #[test]
    fn test_no_host_data_yields_none() {
        assert!(calculate_constraints(0, 0, 0, 25.0, 1000).is_none());
        assert!(calculate_constraints(30_720, 0, 2048, 25.0, 0).is_none());
    }

    #[test]
    fn test_full_reserve_guards_utilization() {
        let analysis = calculate_constraints(30_720, 15, 2048, 100.0, 5000).unwrap();

        assert_eq!(analysis.ha_admission.usable_gb, 0);
        assert_eq!(analysis.ha_admission.utilization_pct, 0.0);
    }
}
