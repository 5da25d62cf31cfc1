//! Seed-key derivation shared by the sector phases.
//!
//! Every stream and named roll is keyed from the root seed string plus the
//! sector coordinate, so sectors never share random state.

use crate::model::{HexCoord, SectorCoord};
use crate::rng::{RollKey, SeededRng};

/// Root of the sequential stream that drives placement within one sector.
pub(super) fn sector_key(seed: &str, sector: SectorCoord) -> String {
    format!("{seed}_{}_{}", sector.q, sector.r)
}

pub(super) fn sector_stream(seed: &str, sector: SectorCoord) -> SeededRng {
    SeededRng::from_key(&sector_key(seed, sector))
}

pub(super) fn core_jitter_stream(seed: &str, sector: SectorCoord) -> SeededRng {
    SeededRng::from_key(&format!("{seed}_core_jitter_{}_{}", sector.q, sector.r))
}

pub(super) fn gate_location_stream(seed: &str, sector: SectorCoord) -> SeededRng {
    SeededRng::from_key(&format!("{seed}_gate_loc_{}_{}", sector.q, sector.r))
}

pub(super) fn region_stream(seed: &str, region: (i32, i32)) -> SeededRng {
    SeededRng::from_key(&format!("{seed}_region_{}_{}", region.0, region.1))
}

/// Base key for the order-independent rolls that enrich one system.
pub(super) fn system_roll_key(sector_key: &str, coord: HexCoord, base_name: &str) -> RollKey {
    RollKey::new(format!("{sector_key}@{coord}|{base_name}"))
}
