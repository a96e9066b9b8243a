//! Deployable-maximum and bottleneck classification
//!
//! Computes how many cells of the proposed size each resource dimension
//! could back and names the dimension that binds first.

use crate::models::ResourceDimension;

use super::SAFE_TARGET_FRACTION;

/// Memory-dimension maximum under the safe utilization target.
///
/// The budget is the limiting usable capacity scaled to the safe
/// target, less platform VM memory.
pub fn max_cells_by_memory(
    limiting_usable_gb: i64,
    platform_vms_gb: i64,
    cell_memory_gb: i64,
) -> i64 {
    if cell_memory_gb <= 0 {
        return 0;
    }
    let budget = limiting_usable_gb as f64 * SAFE_TARGET_FRACTION - platform_vms_gb as f64;
    if budget <= 0.0 {
        return 0;
    }
    (budget / cell_memory_gb as f64).floor() as i64
}

/// Disk-dimension maximum: how many proposed-size cells the currently
/// provisioned cell disk pool can back.
pub fn max_cells_by_disk(disk_pool_gb: i64, cell_disk_gb: i64) -> i64 {
    if disk_pool_gb <= 0 || cell_disk_gb <= 0 {
        return 0;
    }
    disk_pool_gb / cell_disk_gb
}

/// Picks the binding dimension among the evaluated maxima: smallest
/// positive wins, earlier dimension wins ties. A non-positive maximum
/// is ignored unless it is the only dimension evaluated.
pub fn classify_bottleneck(maxima: &[(ResourceDimension, i64)]) -> Option<ResourceDimension> {
    let mut best: Option<(ResourceDimension, i64)> = None;
    for &(dimension, max_cells) in maxima {
        if max_cells <= 0 {
            continue;
        }
        match best {
            Some((_, smallest)) if max_cells >= smallest => {}
            _ => best = Some((dimension, max_cells)),
        }
    }
    best.map(|(dimension, _)| dimension).or_else(|| {
        if maxima.len() == 1 {
            Some(maxima[0].0)
        } else {
            None
        }
    })
}
