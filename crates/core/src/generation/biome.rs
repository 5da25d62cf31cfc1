//! Regional biome resolution.
//!
//! Sectors are bucketed into `regionSize × regionSize` regions using floor
//! division, so negative sectors fall into negative regions.

use crate::model::{BiomeDescriptor, RegionMetadata, SectorCoord};
use crate::sampler::pick_weighted;
use crate::tables::{BiomeColors, GenerationRules, ReferenceTables};

use super::seed::region_stream;

pub fn region_for_sector(sector: SectorCoord, region_size: i32) -> (i32, i32) {
    let size = region_size.max(1);
    (sector.q.div_euclid(size), sector.r.div_euclid(size))
}

pub fn region_metadata(sector: SectorCoord, rules: &GenerationRules) -> RegionMetadata {
    let (rq, rr) = region_for_sector(sector, rules.region_size);
    RegionMetadata { rq, rr, name: format!("Region [{rq}, {rr}]"), id: format!("{rq}_{rr}") }
}

/// Weighted biome pick from a stream seeded by the region, so every sector in
/// a region shares the result.
pub fn biome_for_sector(seed: &str, sector: SectorCoord, tables: &ReferenceTables) -> BiomeDescriptor {
    let region = region_metadata(sector, &tables.rules);
    let roll = region_stream(seed, (region.rq, region.rr)).next_f64();
    match pick_weighted(&tables.biomes, |biome| biome.weight, roll) {
        Some(biome) => BiomeDescriptor {
            name: biome.name.clone(),
            density_multiplier: biome.density_multiplier,
            star_weights: biome.star_weights.clone(),
            colors: biome.colors.clone(),
            region,
        },
        None => neutral_biome(region),
    }
}

fn neutral_biome(region: RegionMetadata) -> BiomeDescriptor {
    BiomeDescriptor {
        name: "Uncharted".to_owned(),
        density_multiplier: 1.0,
        star_weights: Vec::new(),
        colors: BiomeColors { background: "#020617".to_owned(), accent: "#1e293b".to_owned() },
        region,
    }
}
