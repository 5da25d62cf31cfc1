//! Tunable numeric constants for every generation phase.

use serde::{Deserialize, Serialize};

use super::{PopulationRange, WeightedName};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRules {
    pub density_presets: Vec<DensityPreset>,
    pub default_density_rate: f64,
    pub region_size: i32,
    pub placement: PlacementRules,
    pub pois: PoiRules,
    pub systems: SystemRules,
    pub core: CoreSystemRules,
    pub planets: PlanetRules,
    pub multi_star: MultiStarRules,
    pub stations: StationRules,
    pub belts: BeltRules,
    pub jump_gates: JumpGateRules,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityPreset {
    pub value: String,
    pub rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRules {
    pub core_jitter: i32,
    pub core_drift_per_sector: f64,
    pub core_drift_max_sectors: i32,
    pub min_extra_centers: u32,
    pub max_extra_centers: u32,
    pub center_attempts_per_center: u32,
    pub min_center_separation_ratio: f64,
    pub core_falloff: f64,
    pub center_falloff: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiRules {
    pub spawn_chance: f64,
    pub suppression_distance: f64,
    pub suppression_factor: f64,
    pub outer_band: f64,
    pub bridge_tolerance: f64,
    pub bridge_factor: f64,
    pub outskirts_boost: f64,
    pub fallback_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRules {
    pub max_planets: usize,
    pub planet_count_center: f64,
    pub planet_count_sigma: f64,
    pub planet_count_floor: f64,
    pub prefix_clustering: f64,
    pub system_suffix_chance: f64,
    pub planet_greek_naming: f64,
    pub fallback_star_type: String,
    pub unknown_age_unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreSystemRules {
    pub star_rerolls: u32,
    pub excluded_star_types: Vec<String>,
    pub min_planets: usize,
    pub guaranteed_type: String,
    pub type_boosts: Vec<WeightedName>,
    pub size_boosts: Vec<WeightedName>,
    pub age_multiplier: f64,
    pub forced_atmosphere: String,
    pub forced_temperature: String,
    pub inhabit_chance: f64,
    pub population_multiplier: f64,
    pub excluded_tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetRules {
    pub degenerate_star_types: Vec<String>,
    pub max_inhabited_planets: usize,
    pub inhabit_chance: f64,
    pub tag_count_threshold: f64,
    pub colony_tag: String,
    pub base_population: f64,
    pub population_cap: u64,
    pub population_variance_base: f64,
    pub population_variance_range: f64,
    pub fallback_size: String,
    pub fallback_primary_name: String,
    pub fallback_secondary_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiStarRules {
    pub binary_chance: f64,
    pub trinary_chance_when_binary: f64,
    pub type_pool: Vec<String>,
    pub default_age_unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRules {
    pub max_stations: usize,
    pub base_chance: f64,
    pub step_penalty: f64,
    pub trait_count_threshold: f64,
    pub default_population_range: PopulationRange,
    pub fallback_name: String,
    pub allegiances: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeltRules {
    pub chance: f64,
    pub fallback_type: String,
    pub types: Vec<WeightedName>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpGateRules {
    pub base_chance: f64,
    pub suppression_radius: i32,
    pub min_distance: i32,
    pub max_distance: i32,
    pub color: String,
    pub risk: String,
}

impl GenerationRules {
    pub fn density_rate(&self, preset: Option<&str>) -> f64 {
        preset
            .and_then(|value| self.density_presets.iter().find(|candidate| candidate.value == value))
            .map_or(self.default_density_rate, |preset| preset.rate)
    }

    pub fn is_degenerate_star(&self, star_type: &str) -> bool {
        self.planets.degenerate_star_types.iter().any(|kind| kind == star_type)
    }

    pub fn is_core_excluded_star(&self, star_type: &str) -> bool {
        self.core.excluded_star_types.iter().any(|kind| kind == star_type)
    }
}
