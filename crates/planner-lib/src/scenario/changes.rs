//! Configuration change detection
//!
//! Diffs the proposed cell geometry against the snapshot so warnings
//! can carry the edit that triggered them.

use crate::models::{ConfigChange, InfrastructureState, ScenarioInput};

use super::calculator::baseline_cell_geometry;

/// Fields compared between the snapshot and the proposal. Unchanged
/// fields are omitted.
pub fn detect_changes(state: &InfrastructureState, input: &ScenarioInput) -> Vec<ConfigChange> {
    let (cell_memory_gb, cell_cpu, _) = baseline_cell_geometry(state);

    let mut changes = Vec::new();
    push_change(
        &mut changes,
        "cell_count",
        state.total_cell_count,
        input.proposed_cell_count,
    );
    push_change(
        &mut changes,
        "cell_memory_gb",
        cell_memory_gb,
        input.proposed_cell_memory_gb,
    );
    push_change(&mut changes, "cell_cpu", cell_cpu, input.proposed_cell_cpu);
    changes
}

/// Looks up the detected change for a field, cloned for attachment to a
/// warning.
pub fn change_for(changes: &[ConfigChange], field: &str) -> Option<ConfigChange> {
    changes.iter().find(|c| c.field == field).cloned()
}

fn push_change(changes: &mut Vec<ConfigChange>, field: &str, previous: i64, proposed: i64) {
    if previous == proposed {
        return;
    }
    let delta = proposed - previous;
    let delta_pct = if previous != 0 {
        delta as f64 / previous as f64 * 100.0
    } else {
        0.0
    };
    changes.push(ConfigChange {
        field: field.to_string(),
        previous_val: previous,
        proposed_val: proposed,
        delta,
        delta_pct,
    });
}
