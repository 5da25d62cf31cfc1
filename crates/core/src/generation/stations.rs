//! Orbital stations for settled systems.

use crate::model::Station;
use crate::rng::RollKey;
use crate::sampler::RemainingPool;
use crate::tables::{ReferenceTables, StationTrait, StationType};

use super::pick_name;

const FALLBACK_ALLEGIANCE: &str = "Independent";

/// One station is always placed; each further slot `i` is kept with chance
/// `base - i * step` and the run stops at the first miss. Types never repeat.
pub(super) fn generate_stations(
    key: &RollKey,
    has_inhabited_planet: bool,
    tables: &ReferenceTables,
) -> Vec<Station> {
    if !has_inhabited_planet {
        return Vec::new();
    }
    let rules = &tables.rules.stations;
    let mut pool = RemainingPool::new(&tables.stations.types);
    let weight = |kind: &StationType| kind.generation_weight;

    let mut picked: Vec<&StationType> = Vec::new();
    if rules.max_stations > 0 {
        picked.extend(pool.take_weighted(weight, key.roll("station_0")));
    }
    for slot in 1..rules.max_stations {
        let chance = rules.base_chance - slot as f64 * rules.step_penalty;
        if key.roll(&format!("has_station_{slot}")) >= chance {
            break;
        }
        picked.extend(pool.take_weighted(weight, key.roll(&format!("station_{slot}"))));
    }

    picked
        .into_iter()
        .enumerate()
        .map(|(index, kind)| finish_station(&key.child(format!("station_final:{index}")), kind, tables))
        .collect()
}

fn finish_station(key: &RollKey, kind: &StationType, tables: &ReferenceTables) -> Station {
    let rules = &tables.rules.stations;
    let traits = pick_traits(key, kind, tables);

    let range = kind.population_range.unwrap_or(rules.default_population_range);
    let span = range.max.saturating_sub(range.min) as f64 + 1.0;
    let mut population = (key.roll("pop_roll") * span).floor() + range.min as f64;
    for station_trait in &traits {
        population *= station_trait.population_modifier;
    }

    let allegiance = pick_name(&rules.allegiances, key.roll("allegiance")).unwrap_or(FALLBACK_ALLEGIANCE);

    Station {
        kind: kind.kind.clone(),
        name: station_name(key, kind, tables),
        traits,
        population: if population > 0.0 { population.floor() as u64 } else { 0 },
        allegiance: allegiance.to_owned(),
    }
}

fn station_name(key: &RollKey, kind: &StationType, tables: &ReferenceTables) -> String {
    let fallback = || tables.rules.stations.fallback_name.clone();
    let Some(names) = tables.names.station_pool(&kind.kind) else {
        return fallback();
    };
    let prefix = pick_name(&names.prefixes, key.roll("name_prefix"));
    let suffix = pick_name(&names.suffixes, key.roll("name_suffix"));
    match (prefix, suffix) {
        (Some(prefix), Some(suffix)) => format!("{prefix} {suffix}"),
        (Some(only), None) | (None, Some(only)) => only.to_owned(),
        (None, None) => fallback(),
    }
}

/// One or two distinct traits from those that apply to the station type.
fn pick_traits(key: &RollKey, kind: &StationType, tables: &ReferenceTables) -> Vec<StationTrait> {
    let applicable: Vec<&StationTrait> =
        tables.stations.traits.iter().filter(|candidate| candidate.applies_to(&kind.kind)).collect();
    let count =
        if key.roll("trait_count") < tables.rules.stations.trait_count_threshold { 1 } else { 2 };

    let mut pool = RemainingPool::new(&applicable);
    (0..count)
        .map_while(|pick| pool.take_uniform(key.roll(&format!("trait_pick:{pick}"))))
        .map(|station_trait| (*station_trait).clone())
        .collect()
}
