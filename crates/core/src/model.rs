//! Public data models for generated sectors, systems, and points of interest.

use std::{
    collections::{BTreeMap, btree_map},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use xxhash_rust::xxh3::xxh3_64;

use crate::request::GridSize;
use crate::tables::{BiomeColors, PopulationRange, StationTrait, TagDefinition, WeightedName};

/// Offset coordinate of a cell inside one sector grid (odd-q layout).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The six odd-q neighbours, unclipped.
    pub fn neighbors(self) -> [HexCoord; 6] {
        let Self { q, r } = self;
        let diagonal_r = if q.rem_euclid(2) == 1 { r + 1 } else { r - 1 };
        [
            Self::new(q, r - 1),
            Self::new(q, r + 1),
            Self::new(q - 1, r),
            Self::new(q + 1, r),
            Self::new(q - 1, diagonal_r),
            Self::new(q + 1, diagonal_r),
        ]
    }

    /// Straight-line distance in offset space.
    pub fn distance(self, other: HexCoord) -> f64 {
        let dq = f64::from(self.q - other.q);
        let dr = f64::from(self.r - other.r);
        dq.hypot(dr)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseCoordError(String);

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a \"q,r\" coordinate key, got {:?}", self.0)
    }
}

impl FromStr for HexCoord {
    type Err = ParseCoordError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (q, r) = key.split_once(',').ok_or_else(|| ParseCoordError(key.to_owned()))?;
        let q = q.trim().parse().map_err(|_| ParseCoordError(key.to_owned()))?;
        let r = r.trim().parse().map_err(|_| ParseCoordError(key.to_owned()))?;
        Ok(Self { q, r })
    }
}

/// Global identity of a sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectorCoord {
    pub q: i32,
    pub r: i32,
}

impl SectorCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

impl fmt::Display for SectorCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.q, self.r)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLocation {
    pub sector_q: i32,
    pub sector_r: i32,
}

impl From<SectorCoord> for GlobalLocation {
    fn from(sector: SectorCoord) -> Self {
        Self { sector_q: sector.q, sector_r: sector.r }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub age: f64,
    pub age_unit: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    Prefix,
    Suffix,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetTag {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_modifier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_range: Option<PopulationRange>,
}

impl From<&TagDefinition> for PlanetTag {
    fn from(tag: &TagDefinition) -> Self {
        Self {
            name: tag.name.clone(),
            description: tag.description.clone(),
            population_modifier: tag.population_modifier,
            population_range: tag.population_range,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub atmosphere: Option<String>,
    pub temperature: Option<String>,
    pub habitability_rate: f64,
    pub habitable: bool,
    pub is_inhabited: bool,
    pub is_primary_inhabited: bool,
    pub is_core_world: bool,
    pub tags: Vec<PlanetTag>,
    pub name: String,
    pub naming_style: NamingStyle,
    pub population: u64,
}

impl PlanetBody {
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub traits: Vec<StationTrait>,
    pub population: u64,
    pub allegiance: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Belt {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    pub is_core: bool,
    pub stars: Vec<Star>,
    pub bodies: Vec<PlanetBody>,
    pub stations: Vec<Station>,
    pub belts: Vec<Belt>,
    pub name: String,
    pub base_name: String,
    pub name_prefix: String,
    pub global_location: GlobalLocation,
    pub local_location: HexCoord,
}

impl SystemRecord {
    pub fn primary_star(&self) -> Option<&Star> {
        self.stars.first()
    }

    pub fn inhabited_count(&self) -> usize {
        self.bodies.iter().filter(|body| body.is_inhabited).count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<SectorCoord>,
    pub location: HexCoord,
    pub global_location: GlobalLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Occupant {
    System(SystemRecord),
    Poi(Poi),
}

impl Occupant {
    pub fn as_system(&self) -> Option<&SystemRecord> {
        match self {
            Occupant::System(system) => Some(system),
            Occupant::Poi(_) => None,
        }
    }

    pub fn as_poi(&self) -> Option<&Poi> {
        match self {
            Occupant::Poi(poi) => Some(poi),
            Occupant::System(_) => None,
        }
    }
}

/// Cell occupancy for one sector. Serializes as an object keyed by `"q,r"`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorMap {
    cells: BTreeMap<HexCoord, Occupant>,
}

impl SectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `occupant` to a vacant cell. Occupied cells are left untouched
    /// and `false` is returned.
    pub fn place(&mut self, coord: HexCoord, occupant: Occupant) -> bool {
        match self.cells.entry(coord) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(occupant);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Occupant> {
        self.cells.get(&coord)
    }

    pub fn is_occupied(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &Occupant)> {
        self.cells.iter().map(|(coord, occupant)| (*coord, occupant))
    }

    pub fn systems(&self) -> impl Iterator<Item = (HexCoord, &SystemRecord)> {
        self.iter().filter_map(|(coord, occupant)| occupant.as_system().map(|system| (coord, system)))
    }

    pub fn pois(&self) -> impl Iterator<Item = (HexCoord, &Poi)> {
        self.iter().filter_map(|(coord, occupant)| occupant.as_poi().map(|poi| (coord, poi)))
    }
}

impl Serialize for SectorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.cells.iter().map(|(coord, occupant)| (coord.to_string(), occupant)))
    }
}

impl<'de> Deserialize<'de> for SectorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyed = BTreeMap::<String, Occupant>::deserialize(deserializer)?;
        let mut cells = BTreeMap::new();
        for (key, occupant) in keyed {
            let coord: HexCoord = key.parse().map_err(D::Error::custom)?;
            if cells.insert(coord, occupant).is_some() {
                return Err(D::Error::custom(format!("duplicate cell {coord}")));
            }
        }
        Ok(Self { cells })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMetadata {
    pub rq: i32,
    pub rr: i32,
    pub name: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomeDescriptor {
    pub name: String,
    pub density_multiplier: f64,
    pub star_weights: Vec<WeightedName>,
    pub colors: BiomeColors,
    pub region: RegionMetadata,
}

/// Immutable snapshot returned by one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSector {
    pub sector: SectorCoord,
    pub grid_size: GridSize,
    pub systems: SectorMap,
    pub biome: BiomeDescriptor,
}

impl GeneratedSector {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("sector snapshots always serialize")
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn system_count(&self) -> usize {
        self.systems.systems().count()
    }

    pub fn core_system(&self) -> Option<(HexCoord, &SystemRecord)> {
        self.systems.systems().find(|(_, system)| system.is_core)
    }
}
