//! Number of standard (non-core) systems a sector receives.

use crate::request::{DensityMode, GenerationRequest, RangeLimits};
use crate::rng::SeededRng;
use crate::tables::GenerationRules;

/// `preset` and `range` counts are scaled by the biome density multiplier;
/// `manual` counts are exact. The result never exceeds the grid area.
pub(super) fn target_system_count(
    request: &GenerationRequest,
    rules: &GenerationRules,
    density_multiplier: f64,
    rng: &mut SeededRng,
) -> usize {
    let total_cells = request.grid_size.area();
    let count = match request.density_mode {
        DensityMode::Preset => {
            let rate = rules.density_rate(request.density_preset.as_deref());
            scale(total_cells as f64 * rate, density_multiplier)
        }
        DensityMode::Manual => request.manual_count.unwrap_or(0) as usize,
        DensityMode::Range => {
            let limits = request.range_limits.unwrap_or(RangeLimits { min: 0, max: 0 });
            let cap = u32::try_from(total_cells).unwrap_or(u32::MAX);
            let min = limits.min.min(cap);
            let max = limits.max.max(min).min(cap);
            scale(f64::from(rng.range_inclusive(min, max)), density_multiplier)
        }
    };
    count.min(total_cells)
}

fn scale(base: f64, multiplier: f64) -> usize {
    (base * multiplier.max(0.0)).floor() as usize
}
