//! Immutable reference tables consulted by every generation phase.
//!
//! The builtin set is embedded from `crates/core/data/*.json`. A substitute set
//! can be loaded from a directory; files missing from that directory fall back
//! to the builtin text, so a directory may override a single table.

mod rules;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

pub use rules::{
    BeltRules, CoreSystemRules, DensityPreset, GenerationRules, JumpGateRules, MultiStarRules,
    PlacementRules, PlanetRules, PoiRules, StationRules, SystemRules,
};

pub const BUILTIN_STARS: &str = include_str!("../data/stars.json");
pub const BUILTIN_PLANETS: &str = include_str!("../data/planets.json");
pub const BUILTIN_ENVIRONMENT: &str = include_str!("../data/environment.json");
pub const BUILTIN_TAGS: &str = include_str!("../data/tags.json");
pub const BUILTIN_STATIONS: &str = include_str!("../data/stations.json");
pub const BUILTIN_POIS: &str = include_str!("../data/pois.json");
pub const BUILTIN_BIOMES: &str = include_str!("../data/biomes.json");
pub const BUILTIN_NAMES: &str = include_str!("../data/names.json");
pub const BUILTIN_RULES: &str = include_str!("../data/rules.json");

struct TableFile {
    name: &'static str,
    builtin: &'static str,
}

const STARS: TableFile = TableFile { name: "stars.json", builtin: BUILTIN_STARS };
const PLANETS: TableFile = TableFile { name: "planets.json", builtin: BUILTIN_PLANETS };
const ENVIRONMENT: TableFile = TableFile { name: "environment.json", builtin: BUILTIN_ENVIRONMENT };
const TAGS: TableFile = TableFile { name: "tags.json", builtin: BUILTIN_TAGS };
const STATIONS: TableFile = TableFile { name: "stations.json", builtin: BUILTIN_STATIONS };
const POIS: TableFile = TableFile { name: "pois.json", builtin: BUILTIN_POIS };
const BIOMES: TableFile = TableFile { name: "biomes.json", builtin: BUILTIN_BIOMES };
const NAMES: TableFile = TableFile { name: "names.json", builtin: BUILTIN_NAMES };
const RULES: TableFile = TableFile { name: "rules.json", builtin: BUILTIN_RULES };

pub const ACTIVE_GATE_STATE: &str = "Active";
pub const JUMP_GATE_TYPE: &str = "Jump-Gate";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedName {
    pub name: String,
    pub weight: f64,
}

/// Looks up the weight for `name`, `None` when the list does not mention it.
pub fn weight_of(entries: &[WeightedName], name: &str) -> Option<f64> {
    entries.iter().find(|entry| entry.name == name).map(|entry| entry.weight)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarClass {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub freq: f64,
    pub color: String,
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub planet_type_weights: Vec<WeightedName>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetType {
    #[serde(rename = "type")]
    pub kind: String,
    pub habitable: bool,
    pub habitability_rate: f64,
    #[serde(default)]
    pub atmosphere_weights: Vec<WeightedName>,
    #[serde(default)]
    pub temperature_weights: Vec<WeightedName>,
    #[serde(default)]
    pub size_modifiers: Vec<WeightedName>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetSize {
    pub name: String,
    pub weight: f64,
    pub population_factor: f64,
}

/// An atmosphere or temperature band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCondition {
    pub name: String,
    pub habitable: bool,
    pub habitability_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentTables {
    pub sizes: Vec<PlanetSize>,
    pub atmospheres: Vec<EnvironmentCondition>,
    pub temperatures: Vec<EnvironmentCondition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inhabited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habitable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_world: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub requirements: TagRequirements,
    #[serde(default)]
    pub incompatible_tags: Vec<String>,
    #[serde(default)]
    pub population_modifier: Option<f64>,
    #[serde(default)]
    pub population_range: Option<PopulationRange>,
}

impl TagDefinition {
    pub fn is_core_specific(&self) -> bool {
        self.requirements.core_world == Some(true)
    }

    pub fn excludes(&self, other: &str) -> bool {
        self.incompatible_tags.iter().any(|name| name == other)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationType {
    #[serde(rename = "type")]
    pub kind: String,
    pub generation_weight: f64,
    #[serde(default)]
    pub population_range: Option<PopulationRange>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTrait {
    pub name: String,
    pub population_modifier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_types: Option<Vec<String>>,
}

impl StationTrait {
    pub fn applies_to(&self, station_type: &str) -> bool {
        self.station_types
            .as_ref()
            .is_none_or(|types| types.iter().any(|kind| kind == station_type))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationTables {
    pub types: Vec<StationType>,
    pub traits: Vec<StationTrait>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoiType {
    pub name: String,
    pub color: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoiTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoiTables {
    pub types: Vec<PoiType>,
    pub pool: Vec<PoiTemplate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeColors {
    pub background: String,
    pub accent: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomeDefinition {
    pub name: String,
    pub weight: f64,
    pub density_multiplier: f64,
    #[serde(default)]
    pub star_weights: Vec<WeightedName>,
    pub colors: BiomeColors,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationNamePool {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameTables {
    pub greek_alphabet: Vec<String>,
    pub roman_numerals: Vec<String>,
    pub name_prefixes: Vec<String>,
    pub name_suffixes: Vec<String>,
    pub star_name_suffixes: Vec<String>,
    pub system_name_suffixes: Vec<String>,
    pub companion_star_suffixes: Vec<String>,
    pub primary_planet_suffixes: Vec<String>,
    pub secondary_planet_prefixes: Vec<String>,
    pub secondary_planet_suffixes: Vec<String>,
    #[serde(default)]
    pub station_names: Vec<StationNamePool>,
}

impl NameTables {
    pub fn station_pool(&self, station_type: &str) -> Option<&StationNamePool> {
        self.station_names.iter().find(|pool| pool.kind == station_type)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceTables {
    pub stars: Vec<StarClass>,
    pub planets: Vec<PlanetType>,
    pub environment: EnvironmentTables,
    pub tags: Vec<TagDefinition>,
    pub stations: StationTables,
    pub pois: PoiTables,
    pub biomes: Vec<BiomeDefinition>,
    pub names: NameTables,
    pub rules: GenerationRules,
}

impl ReferenceTables {
    pub fn builtin() -> Self {
        Self::assemble(|file| Ok(file.builtin.to_owned()))
            .expect("builtin reference tables should parse and validate")
    }

    /// Loads tables from `dir`, using the builtin text for any file it lacks.
    pub fn from_dir(dir: &Path) -> Result<Self, TablesError> {
        Self::assemble(|file| {
            let path = dir.join(file.name);
            if !path.is_file() {
                debug!(table = file.name, dir = %dir.display(), "using builtin reference table");
                return Ok(file.builtin.to_owned());
            }
            fs::read_to_string(&path).map_err(|source| TablesError::Read { path, source })
        })
    }

    fn assemble(
        mut read: impl FnMut(&TableFile) -> Result<String, TablesError>,
    ) -> Result<Self, TablesError> {
        let tables = Self {
            stars: parse_table(&STARS, &read(&STARS)?)?,
            planets: parse_table(&PLANETS, &read(&PLANETS)?)?,
            environment: parse_table(&ENVIRONMENT, &read(&ENVIRONMENT)?)?,
            tags: parse_table(&TAGS, &read(&TAGS)?)?,
            stations: parse_table(&STATIONS, &read(&STATIONS)?)?,
            pois: parse_table(&POIS, &read(&POIS)?)?,
            biomes: parse_table(&BIOMES, &read(&BIOMES)?)?,
            names: parse_table(&NAMES, &read(&NAMES)?)?,
            rules: parse_table(&RULES, &read(&RULES)?)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    pub fn star_class(&self, kind: &str) -> Option<&StarClass> {
        self.stars.iter().find(|star| star.kind == kind)
    }

    pub fn planet_type(&self, kind: &str) -> Option<&PlanetType> {
        self.planets.iter().find(|planet| planet.kind == kind)
    }

    pub fn is_habitable_type(&self, kind: &str) -> bool {
        self.planet_type(kind).is_some_and(|planet| planet.habitable)
    }

    pub fn size(&self, name: &str) -> Option<&PlanetSize> {
        self.environment.sizes.iter().find(|size| size.name == name)
    }

    pub fn atmosphere(&self, name: &str) -> Option<&EnvironmentCondition> {
        self.environment.atmospheres.iter().find(|condition| condition.name == name)
    }

    pub fn temperature(&self, name: &str) -> Option<&EnvironmentCondition> {
        self.environment.temperatures.iter().find(|condition| condition.name == name)
    }

    pub fn tag(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    pub fn poi_type(&self, name: &str) -> Option<&PoiType> {
        self.pois.types.iter().find(|poi| poi.name == name)
    }

    /// Checks cross-table references and the constraints generation relies on.
    pub fn validate(&self) -> Result<(), TablesError> {
        if !self.stars.iter().any(|star| star.freq > 0.0) {
            return Err(invalid("star table has no entry with positive frequency"));
        }
        let fallback_star = &self.rules.systems.fallback_star_type;
        if self.star_class(fallback_star).is_none() {
            return Err(invalid(format!("fallback star type `{fallback_star}` is not defined")));
        }
        if self.rules.is_core_excluded_star(fallback_star) {
            return Err(invalid(format!(
                "fallback star type `{fallback_star}` is excluded from core systems"
            )));
        }
        for star in &self.stars {
            for weighted in &star.planet_type_weights {
                if self.planet_type(&weighted.name).is_none() {
                    return Err(invalid(format!(
                        "star `{}` references unknown planet type `{}`",
                        star.kind, weighted.name
                    )));
                }
            }
        }
        if self.environment.sizes.is_empty() {
            return Err(invalid("planet size table is empty"));
        }
        for planet in &self.planets {
            let unknown_atmosphere =
                planet.atmosphere_weights.iter().find(|entry| self.atmosphere(&entry.name).is_none());
            let unknown_temperature = planet
                .temperature_weights
                .iter()
                .find(|entry| self.temperature(&entry.name).is_none());
            if let Some(entry) = unknown_atmosphere.or(unknown_temperature) {
                return Err(invalid(format!(
                    "planet type `{}` references unknown condition `{}`",
                    planet.kind, entry.name
                )));
            }
        }
        let guaranteed = &self.rules.core.guaranteed_type;
        if !self.is_habitable_type(guaranteed) {
            return Err(invalid(format!("core guaranteed type `{guaranteed}` is not habitable")));
        }
        if self.biomes.is_empty() {
            return Err(invalid("biome table is empty"));
        }
        if self.rules.region_size < 1 {
            return Err(invalid("regionSize must be at least 1"));
        }
        for template in &self.pois.pool {
            if template.kind == JUMP_GATE_TYPE
                && template.state.as_deref() == Some(ACTIVE_GATE_STATE)
            {
                return Err(invalid(format!(
                    "POI pool entry `{}` is an active gate; only the gate network creates those",
                    template.name
                )));
            }
        }
        let gates = &self.rules.jump_gates;
        if gates.min_distance < 1 || gates.min_distance > gates.max_distance {
            return Err(invalid(format!(
                "jump gate distance range {}..={} is empty or includes zero",
                gates.min_distance, gates.max_distance
            )));
        }
        if gates.suppression_radius < gates.max_distance {
            return Err(invalid(format!(
                "jump gate suppression radius {} is below the maximum gate distance {}",
                gates.suppression_radius, gates.max_distance
            )));
        }
        if self.rules.planets.population_variance_base < 0.0 {
            return Err(invalid("population variance base must be non-negative"));
        }
        if self.rules.planets.max_inhabited_planets < 1 {
            return Err(invalid("maxInhabitedPlanets must allow at least the primary settlement"));
        }
        Ok(())
    }
}

fn parse_table<T: DeserializeOwned>(file: &TableFile, json: &str) -> Result<T, TablesError> {
    serde_json::from_str(json).map_err(|source| TablesError::Parse { table: file.name, source })
}

fn invalid(message: impl Into<String>) -> TablesError {
    TablesError::Invalid(message.into())
}

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("failed to read reference table from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse reference table {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid reference tables: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn builtin_tables_cover_every_star_class() {
        let tables = ReferenceTables::builtin();
        for kind in ["O", "B", "A", "F", "G", "K", "M", "Neutron", "Black Hole"] {
            assert!(tables.star_class(kind).is_some(), "missing star class {kind}");
        }
        assert!(tables.is_habitable_type("Terrestrial"));
        assert!(!tables.is_habitable_type("Gas Giant"));
    }

    #[test]
    fn density_rate_falls_back_for_unknown_presets() {
        let rules = &ReferenceTables::builtin().rules;
        assert_eq!(rules.density_rate(Some("standard")), 0.3);
        assert_eq!(rules.density_rate(Some("packed")), 0.6);
        assert_eq!(rules.density_rate(Some("nonsense")), rules.default_density_rate);
        assert_eq!(rules.density_rate(None), rules.default_density_rate);
    }

    #[test]
    fn validation_rejects_active_gates_in_poi_pool() {
        let mut tables = ReferenceTables::builtin();
        tables.pois.pool.push(PoiTemplate {
            kind: JUMP_GATE_TYPE.to_owned(),
            name: "Rogue Gate".to_owned(),
            weight: 1.0,
            risk: None,
            color: None,
            state: Some(ACTIVE_GATE_STATE.to_owned()),
            description: None,
        });
        assert!(matches!(tables.validate(), Err(TablesError::Invalid(_))));
    }

    #[test]
    fn validation_rejects_suppression_radius_below_gate_reach() {
        let mut tables = ReferenceTables::builtin();
        tables.rules.jump_gates.suppression_radius = tables.rules.jump_gates.max_distance - 1;
        assert!(matches!(tables.validate(), Err(TablesError::Invalid(_))));
    }

    #[test]
    fn validation_rejects_zero_settlement_cap() {
        let mut tables = ReferenceTables::builtin();
        tables.rules.planets.max_inhabited_planets = 0;
        assert!(matches!(tables.validate(), Err(TablesError::Invalid(_))));
    }

    #[test]
    fn zero_settlement_cap_in_rules_override_fails_to_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut rules: serde_json::Value =
            serde_json::from_str(BUILTIN_RULES).expect("builtin rules parse");
        rules["planets"]["maxInhabitedPlanets"] = serde_json::json!(0);
        fs::write(dir.path().join("rules.json"), rules.to_string()).expect("write rules");

        assert!(matches!(ReferenceTables::from_dir(dir.path()), Err(TablesError::Invalid(_))));
    }

    #[test]
    fn validation_rejects_unknown_planet_reference() {
        let mut tables = ReferenceTables::builtin();
        tables.stars[0]
            .planet_type_weights
            .push(WeightedName { name: "Crystal".to_owned(), weight: 1.0 });
        assert!(matches!(tables.validate(), Err(TablesError::Invalid(_))));
    }

    #[test]
    fn directory_override_replaces_only_present_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut rules: serde_json::Value =
            serde_json::from_str(BUILTIN_RULES).expect("builtin rules parse");
        rules["belts"]["chance"] = serde_json::json!(1.0);
        fs::write(dir.path().join("rules.json"), rules.to_string()).expect("write rules");

        let tables = ReferenceTables::from_dir(dir.path()).expect("override loads");
        let builtin = ReferenceTables::builtin();
        assert_eq!(tables.rules.belts.chance, 1.0);
        assert_eq!(tables.stars, builtin.stars);
    }

    #[test]
    fn directory_override_reports_parse_errors_with_table_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("tags.json"), "{ not json").expect("write tags");

        let error = ReferenceTables::from_dir(dir.path()).expect_err("broken table must fail");
        assert!(matches!(error, TablesError::Parse { table: "tags.json", .. }));
    }
}
