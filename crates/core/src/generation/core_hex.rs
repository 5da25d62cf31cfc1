//! Placement of the guaranteed core system inside a sector.

use crate::model::{HexCoord, SectorCoord};
use crate::request::GridSize;
use crate::tables::PlacementRules;

use super::seed::core_jitter_stream;

/// Grid cell reserved for the sector's core system.
///
/// Starts at the grid centre, drifts toward the expansion front by a fraction
/// of the grid per sector of distance from the origin (capped), then adds a
/// seeded jitter. Always inside the grid.
pub fn ideal_core_hex(
    seed: &str,
    sector: SectorCoord,
    grid_size: GridSize,
    rules: &PlacementRules,
) -> HexCoord {
    let width = f64::from(grid_size.width);
    let height = f64::from(grid_size.height);
    let mid_q = f64::from(grid_size.width / 2);
    let mid_r = f64::from(grid_size.height / 2);

    let drift_q = drift(sector.q, rules) * width * rules.core_drift_per_sector;
    let drift_r = drift(sector.r, rules) * height * rules.core_drift_per_sector;

    let mut jitter = core_jitter_stream(seed, sector);
    let spread = rules.core_jitter.max(0);
    let jitter_q = jitter.range_inclusive(0, spread as u32 * 2) as i32 - spread;
    let jitter_r = jitter.range_inclusive(0, spread as u32 * 2) as i32 - spread;

    HexCoord::new(
        clamp_axis(mid_q + drift_q + f64::from(jitter_q), grid_size.width),
        clamp_axis(mid_r + drift_r + f64::from(jitter_r), grid_size.height),
    )
}

fn drift(sector_axis: i32, rules: &PlacementRules) -> f64 {
    f64::from(sector_axis.signum() * sector_axis.abs().min(rules.core_drift_max_sectors))
}

fn clamp_axis(value: f64, extent: u32) -> i32 {
    let upper = extent.saturating_sub(1) as i32;
    (value.round() as i32).clamp(0, upper)
}
