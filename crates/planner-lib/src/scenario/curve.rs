//! Scheduling throughput estimation
//!
//! Auction-based placement degrades as the scheduler fans out to more
//! cells. This module interpolates a measured `(cells, TPS)` curve to
//! estimate throughput at a given cell count and grade the result
//! against the curve's own peak.

use crate::models::{CurvePoint, ThroughputStatus};

/// Share of the curve peak at or above which scheduling is optimal
const OPTIMAL_PEAK_FRACTION: f64 = 0.80;
/// Share of the curve peak below which scheduling is critical
const DEGRADED_PEAK_FRACTION: f64 = 0.50;

/// Measured placement profile: throughput peaks in the single-digit
/// cell range and falls off sharply past ~200 cells.
pub fn default_tps_curve() -> Vec<CurvePoint> {
    vec![
        CurvePoint { cells: 1, tps: 284 },
        CurvePoint { cells: 3, tps: 1964 },
        CurvePoint { cells: 9, tps: 1932 },
        CurvePoint { cells: 100, tps: 1389 },
        CurvePoint { cells: 210, tps: 104 },
    ]
}

/// Estimates scheduling throughput at `cell_count` from the given curve.
///
/// An empty curve disables the estimate entirely. Counts outside the
/// curve clamp flat to the nearest endpoint; counts between points
/// interpolate linearly, truncated to whole TPS.
pub fn estimate_tps(cell_count: i64, curve: &[CurvePoint]) -> (i64, ThroughputStatus) {
    if curve.is_empty() {
        return (0, ThroughputStatus::Disabled);
    }
    if cell_count <= 0 {
        return (0, ThroughputStatus::Unknown);
    }

    let mut points = curve.to_vec();
    points.sort_by_key(|p| p.cells);

    let tps = interpolate(cell_count, &points);
    (tps, classify_throughput(tps, &points))
}

fn interpolate(cell_count: i64, points: &[CurvePoint]) -> i64 {
    if cell_count <= points[0].cells {
        return points[0].tps;
    }
    for pair in points.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if cell_count == left.cells {
            return left.tps;
        }
        if cell_count < right.cells {
            let span = (right.cells - left.cells) as f64;
            let fraction = (cell_count - left.cells) as f64 / span;
            return (left.tps as f64 + (right.tps - left.tps) as f64 * fraction) as i64;
        }
    }
    points[points.len() - 1].tps
}

fn classify_throughput(tps: i64, points: &[CurvePoint]) -> ThroughputStatus {
    let peak = points.iter().map(|p| p.tps).max().unwrap_or(0);
    if peak <= 0 {
        return ThroughputStatus::Unknown;
    }
    let share = tps as f64 / peak as f64;
    if share >= OPTIMAL_PEAK_FRACTION {
        ThroughputStatus::Optimal
    } else if share >= DEGRADED_PEAK_FRACTION {
        ThroughputStatus::Degraded
    } else {
        ThroughputStatus::Critical
    }
}
