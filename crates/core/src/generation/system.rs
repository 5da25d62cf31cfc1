//! Star selection, system skeletons, naming, and companion stars.

use tracing::warn;

use crate::model::{BiomeDescriptor, HexCoord, SectorMap, Star};
use crate::rng::{RollKey, SeededRng, index_for_roll};
use crate::sampler::{WeightedTable, pick_weighted_index};
use crate::tables::{ReferenceTables, StarClass, WeightedName, weight_of};

use super::{pick_name, round_hundredths};

/// Frequency-weighted star picker with the biome's per-class multipliers.
pub(super) struct StarPicker<'a> {
    tables: &'a ReferenceTables,
    weighted: WeightedTable<'a, StarClass>,
}

impl<'a> StarPicker<'a> {
    pub(super) fn new(tables: &'a ReferenceTables, biome: &BiomeDescriptor) -> Self {
        let weighted = WeightedTable::new(&tables.stars, |star| {
            star.freq * weight_of(&biome.star_weights, &star.kind).unwrap_or(1.0)
        });
        Self { tables, weighted }
    }

    fn fallback(&self) -> Option<&'a StarClass> {
        self.tables.star_class(&self.tables.rules.systems.fallback_star_type)
    }

    pub(super) fn pick(&self, rng: &mut SeededRng) -> Option<&'a StarClass> {
        self.weighted.pick(rng.next_f64()).or_else(|| self.fallback())
    }

    /// Re-rolls excluded classes a bounded number of times, then settles on
    /// the fallback class.
    pub(super) fn pick_core(&self, rng: &mut SeededRng) -> Option<&'a StarClass> {
        let rules = &self.tables.rules;
        let mut star = self.pick(rng);
        let mut attempts = 0;
        while star.is_some_and(|class| rules.is_core_excluded_star(&class.kind))
            && attempts < rules.core.star_rerolls
        {
            star = self.pick(rng);
            attempts += 1;
        }
        match star {
            Some(class) if rules.is_core_excluded_star(&class.kind) => {
                warn!(
                    star = %class.kind,
                    attempts,
                    "core star rerolls exhausted; using fallback class"
                );
                self.fallback()
            }
            other => other,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct BodySkeleton {
    pub(super) kind: String,
    pub(super) name: String,
}

/// A system before planet enrichment, stations, belts, and companions.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct SystemSkeleton {
    pub(super) star: Star,
    pub(super) bodies: Vec<BodySkeleton>,
    pub(super) name: String,
    pub(super) base_name: String,
    pub(super) name_prefix: String,
}

pub(super) struct SkeletonContext<'a> {
    pub(super) tables: &'a ReferenceTables,
    pub(super) coord: HexCoord,
    pub(super) is_core: bool,
    pub(super) placed: &'a SectorMap,
}

/// Draw order on the sector stream: planet count and types, age, name prefix,
/// name suffix, star suffix, optional system suffix, planet naming scheme.
pub(super) fn generate_skeleton(
    context: &SkeletonContext<'_>,
    star_class: Option<&StarClass>,
    rng: &mut SeededRng,
) -> SystemSkeleton {
    let tables = context.tables;
    let star_kind = star_class
        .map_or_else(|| tables.rules.systems.fallback_star_type.clone(), |class| class.kind.clone());
    let bodies = star_class.map_or_else(Vec::new, |class| {
        generate_body_skeletons(tables, class, context.is_core, rng)
    });

    let mut star = Star { kind: star_kind, name: String::new(), age: 0.0, age_unit: String::new() };
    assign_primary_age(&mut star, star_class, tables, rng);
    if context.is_core {
        star.age = round_hundredths(star.age * tables.rules.core.age_multiplier);
    }

    let name_prefix = build_name_prefix(context, rng);
    let names = &tables.names;
    let name_suffix = pick_name(&names.name_suffixes, rng.next_f64()).unwrap_or_default();
    let base_name = format!("{name_prefix}{name_suffix}");
    let star_suffix = pick_name(&names.star_name_suffixes, rng.next_f64()).unwrap_or_default();
    star.name = format!("{base_name} {star_suffix}").trim_end().to_owned();

    let mut name = base_name.clone();
    if rng.next_f64() < tables.rules.systems.system_suffix_chance {
        if let Some(suffix) = pick_name(&names.system_name_suffixes, rng.next_f64()) {
            name = format!("{base_name} {suffix}");
        }
    }

    let bodies = assign_sequence_names(bodies, tables, rng);
    SystemSkeleton { star, bodies, name, base_name, name_prefix }
}

fn planet_count_weights(tables: &ReferenceTables, is_core: bool) -> Vec<f64> {
    let systems = &tables.rules.systems;
    let two_sigma_squared = 2.0 * systems.planet_count_sigma * systems.planet_count_sigma;
    (0..=systems.max_planets)
        .map(|count| {
            if is_core && count < tables.rules.core.min_planets {
                return 0.0;
            }
            let offset = count as f64 - systems.planet_count_center;
            (-(offset * offset) / two_sigma_squared).exp() + systems.planet_count_floor
        })
        .collect()
}

fn generate_body_skeletons(
    tables: &ReferenceTables,
    star_class: &StarClass,
    is_core: bool,
    rng: &mut SeededRng,
) -> Vec<BodySkeleton> {
    if tables.rules.is_degenerate_star(&star_class.kind) || star_class.planet_type_weights.is_empty() {
        return Vec::new();
    }

    let count_weights = planet_count_weights(tables, is_core);
    let planet_count =
        pick_weighted_index(&count_weights, |weight| *weight, rng.next_f64()).unwrap_or(0);

    let core_rules = &tables.rules.core;
    let type_weight = |entry: &WeightedName| {
        let boost = if is_core { weight_of(&core_rules.type_boosts, &entry.name) } else { None };
        entry.weight * boost.unwrap_or(1.0)
    };

    let mut bodies: Vec<BodySkeleton> = (0..planet_count)
        .filter_map(|_| {
            let index = pick_weighted_index(&star_class.planet_type_weights, type_weight, rng.next_f64())?;
            let kind = star_class.planet_type_weights[index].name.clone();
            Some(BodySkeleton { kind, name: String::new() })
        })
        .collect();

    if is_core && !bodies.is_empty() && !bodies.iter().any(|body| body.kind == core_rules.guaranteed_type)
    {
        let index = rng.below(bodies.len());
        bodies[index].kind = core_rules.guaranteed_type.clone();
    }
    bodies
}

fn assign_primary_age(
    star: &mut Star,
    star_class: Option<&StarClass>,
    tables: &ReferenceTables,
    rng: &mut SeededRng,
) {
    match star_class.and_then(|class| class.age_range.as_ref()) {
        Some(range) => {
            star.age = round_hundredths(rng.next_f64() * (range.max - range.min) + range.min);
            star.age_unit = range.unit.clone();
        }
        None => {
            star.age = 0.0;
            star.age_unit = tables.rules.systems.unknown_age_unit.clone();
        }
    }
}

/// Reuses a neighbouring system's prefix with the clustering probability,
/// which produces locally consistent naming regions.
fn build_name_prefix(context: &SkeletonContext<'_>, rng: &mut SeededRng) -> String {
    let neighbor_prefixes: Vec<&str> = context
        .coord
        .neighbors()
        .into_iter()
        .filter_map(|neighbor| context.placed.get(neighbor)?.as_system())
        .map(|system| system.name_prefix.as_str())
        .filter(|prefix| !prefix.is_empty())
        .collect();

    if !neighbor_prefixes.is_empty()
        && rng.next_f64() < context.tables.rules.systems.prefix_clustering
    {
        return neighbor_prefixes[rng.below(neighbor_prefixes.len())].to_owned();
    }
    pick_name(&context.tables.names.name_prefixes, rng.next_f64()).unwrap_or("Nova").to_owned()
}

fn assign_sequence_names(
    mut bodies: Vec<BodySkeleton>,
    tables: &ReferenceTables,
    rng: &mut SeededRng,
) -> Vec<BodySkeleton> {
    if bodies.is_empty() {
        return bodies;
    }
    let use_greek = rng.next_f64() < tables.rules.systems.planet_greek_naming;
    let sequence =
        if use_greek { &tables.names.greek_alphabet } else { &tables.names.roman_numerals };
    for (index, body) in bodies.iter_mut().enumerate() {
        body.name = sequence.get(index).cloned().unwrap_or_else(|| (index + 1).to_string());
    }
    bodies
}

/// Appends binary and trinary companions using named rolls. Core systems draw
/// from the companion pool with excluded classes removed.
pub(super) fn append_companion_stars(
    mut stars: Vec<Star>,
    key: &RollKey,
    is_core: bool,
    tables: &ReferenceTables,
) -> Vec<Star> {
    let Some(primary) = stars.first().cloned() else {
        return stars;
    };
    let rules = &tables.rules.multi_star;
    let pool: Vec<&String> = rules
        .type_pool
        .iter()
        .filter(|kind| !is_core || !tables.rules.is_core_excluded_star(kind))
        .collect();
    if pool.is_empty() || key.roll("binary") >= rules.binary_chance {
        return stars;
    }

    let suffixes = &tables.names.companion_star_suffixes;
    let age_unit =
        if primary.age_unit.is_empty() { rules.default_age_unit.clone() } else { primary.age_unit.clone() };
    let companion = |type_roll: &str, age_roll: &str, ordinal: usize| {
        let kind = pool[index_for_roll(key.roll(type_roll), pool.len())].clone();
        let suffix = suffixes.get(ordinal).cloned().unwrap_or_else(|| companion_letter(ordinal));
        Star {
            kind,
            name: format!("{} {suffix}", primary.name),
            age: round_hundredths(1.0 + key.roll(age_roll) * 9.0),
            age_unit: age_unit.clone(),
        }
    };

    stars.push(companion("type2", "age2", 0));
    if key.roll("trinary") < rules.trinary_chance_when_binary {
        stars.push(companion("type3", "age3", 1));
    }
    stars
}

fn companion_letter(ordinal: usize) -> String {
    char::from(b'B' + ordinal as u8).to_string()
}
