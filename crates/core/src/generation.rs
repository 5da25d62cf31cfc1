//! Deterministic sector generation split into per-phase submodules.

pub mod biome;
pub mod jump_gate;

mod belts;
mod core_hex;
mod density;
mod placement;
mod planets;
mod poi;
mod sector;
mod seed;
mod stations;
mod system;

use std::ops::RangeInclusive;

pub use biome::{biome_for_sector, region_for_sector, region_metadata};
pub use core_hex::ideal_core_hex;
pub use jump_gate::{GateLink, JumpGateNetwork};
pub use sector::SectorGenerator;

use crate::model::GeneratedSector;
use crate::request::GenerationRequest;
use crate::rng::index_for_roll;
use crate::tables::ReferenceTables;

pub fn generate_sector(request: &GenerationRequest, tables: &ReferenceTables) -> GeneratedSector {
    SectorGenerator::new(tables).generate(request)
}

/// Generates every sector in the rectangle, q-major. Each sector is produced
/// independently, so the result matches individual [`generate_sector`] calls.
pub fn generate_sector_block(
    request: &GenerationRequest,
    tables: &ReferenceTables,
    q_range: RangeInclusive<i32>,
    r_range: RangeInclusive<i32>,
) -> Vec<GeneratedSector> {
    let generator = SectorGenerator::new(tables);
    q_range
        .flat_map(|sector_q| r_range.clone().map(move |sector_r| (sector_q, sector_r)))
        .map(|(sector_q, sector_r)| {
            generator.generate(&request.clone().with_sector(sector_q, sector_r))
        })
        .collect()
}

/// `floor(roll * len)` pick from a name list, `None` when the list is empty.
fn pick_name(names: &[String], roll: f64) -> Option<&str> {
    if names.is_empty() {
        return None;
    }
    Some(names[index_for_roll(roll, names.len())].as_str())
}

/// Rounds to two decimal places, the precision star ages are reported at.
fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::GridSize;

    #[test]
    fn generate_sector_matches_sector_generator_output() {
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::preset("helper", GridSize::new(6, 6), "standard");

        let from_helper = generate_sector(&request, &tables);
        let from_generator = SectorGenerator::new(&tables).generate(&request);

        assert_eq!(from_helper, from_generator);
    }

    #[test]
    fn block_generation_is_independent_of_visit_order() {
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::preset("block", GridSize::new(5, 5), "dense");

        let block = generate_sector_block(&request, &tables, -1..=1, 0..=1);
        assert_eq!(block.len(), 6);

        for sector in block.iter().rev() {
            let single = generate_sector(
                &request.clone().with_sector(sector.sector.q, sector.sector.r),
                &tables,
            );
            assert_eq!(single.fingerprint(), sector.fingerprint());
        }
    }

    #[test]
    fn pick_name_handles_empty_lists() {
        assert_eq!(pick_name(&[], 0.4), None);
        let names = vec!["Alpha".to_owned(), "Beta".to_owned()];
        assert_eq!(pick_name(&names, 0.99), Some("Beta"));
    }

    #[test]
    fn hundredths_rounding_matches_reported_precision() {
        assert_eq!(round_hundredths(4.567), 4.57);
        assert_eq!(round_hundredths(1.0), 1.0);
    }
}
