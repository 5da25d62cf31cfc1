//! Habitable-type guarantee, atmosphere, temperature, size, and habitability.

use crate::model::{NamingStyle, PlanetBody};
use crate::rng::{RollKey, index_for_roll};
use crate::sampler::pick_weighted;
use crate::tables::{EnvironmentCondition, PlanetSize, ReferenceTables, WeightedName, weight_of};

use super::PlanetContext;

/// Retypes one body to a habitable type when the system has none and the
/// primary star allows one.
pub(super) fn ensure_habitable_type(context: &PlanetContext<'_>, kinds: &mut [String]) {
    let tables = context.tables;
    if kinds.is_empty() || kinds.iter().any(|kind| tables.is_habitable_type(kind)) {
        return;
    }
    let Some(star) = context
        .primary_star
        .filter(|kind| !tables.rules.is_degenerate_star(kind))
        .and_then(|kind| tables.star_class(kind))
    else {
        return;
    };

    let habitable: Vec<&str> = star
        .planet_type_weights
        .iter()
        .filter(|entry| entry.weight > 0.0 && tables.is_habitable_type(&entry.name))
        .map(|entry| entry.name.as_str())
        .collect();
    if habitable.is_empty() {
        return;
    }

    let index = index_for_roll(context.key.roll("habitable_fix"), kinds.len());
    let kind = habitable[index_for_roll(context.key.roll("habitable_fix_type"), habitable.len())];
    kinds[index] = kind.to_owned();
}

pub(super) fn assign_environment(
    context: &PlanetContext<'_>,
    kinds: &[String],
    core_candidate: Option<usize>,
) -> Vec<PlanetBody> {
    kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| {
            environment_for(context, &context.body_key(index), kind, core_candidate == Some(index))
        })
        .collect()
}

fn environment_for(
    context: &PlanetContext<'_>,
    key: &RollKey,
    kind: &str,
    forced_core_world: bool,
) -> PlanetBody {
    let tables = context.tables;
    let planet = tables.planet_type(kind);
    let no_weights: &[WeightedName] = &[];

    let (atmosphere, temperature) = if forced_core_world {
        (Some(tables.rules.core.forced_atmosphere.clone()), Some(tables.rules.core.forced_temperature.clone()))
    } else {
        (
            pick_condition(
                &tables.environment.atmospheres,
                planet.map_or(no_weights, |planet| planet.atmosphere_weights.as_slice()),
                key.roll("atmosphere"),
            ),
            pick_condition(
                &tables.environment.temperatures,
                planet.map_or(no_weights, |planet| planet.temperature_weights.as_slice()),
                key.roll("temperature"),
            ),
        )
    };

    let atmosphere_data = atmosphere.as_deref().and_then(|name| tables.atmosphere(name));
    let temperature_data = temperature.as_deref().and_then(|name| tables.temperature(name));
    let base_rate = planet.map_or(0.0, |planet| planet.habitability_rate);
    let habitability_rate = (base_rate
        * atmosphere_data.map_or(1.0, |condition| condition.habitability_rate)
        * temperature_data.map_or(1.0, |condition| condition.habitability_rate))
    .clamp(0.0, 1.0);
    let habitable = planet.is_some_and(|planet| planet.habitable)
        && atmosphere_data.is_none_or(|condition| condition.habitable)
        && temperature_data.is_none_or(|condition| condition.habitable);

    PlanetBody {
        kind: kind.to_owned(),
        size: pick_size(context, kind, key.roll("size")),
        atmosphere,
        temperature,
        habitability_rate,
        habitable,
        is_inhabited: false,
        is_primary_inhabited: false,
        is_core_world: false,
        tags: Vec::new(),
        name: String::new(),
        naming_style: NamingStyle::Suffix,
        population: 0,
    }
}

/// The planet type's weight list doubles as its allow-list. An empty list
/// allows every condition; when none of the allowed conditions carries weight
/// the pick is uniform.
fn pick_condition(table: &[EnvironmentCondition], weights: &[WeightedName], roll: f64) -> Option<String> {
    let candidates: Vec<&str> = if weights.is_empty() {
        table.iter().map(|condition| condition.name.as_str()).collect()
    } else {
        weights
            .iter()
            .map(|entry| entry.name.as_str())
            .filter(|name| table.iter().any(|condition| condition.name == *name))
            .collect()
    };
    if candidates.is_empty() {
        return None;
    }

    let weight = |name: &&str| weight_of(weights, name).unwrap_or(0.0);
    pick_weighted(&candidates, weight, roll)
        .or_else(|| candidates.get(index_for_roll(roll, candidates.len())))
        .map(|name| (*name).to_owned())
}

fn pick_size(context: &PlanetContext<'_>, kind: &str, roll: f64) -> String {
    let tables: &ReferenceTables = context.tables;
    let modifiers = tables.planet_type(kind).map(|planet| planet.size_modifiers.as_slice());
    let core_boosts = context.is_core_system.then_some(tables.rules.core.size_boosts.as_slice());

    let weight = |size: &PlanetSize| {
        let modifier = modifiers.and_then(|entries| weight_of(entries, &size.name)).unwrap_or(1.0);
        let boost = core_boosts.and_then(|entries| weight_of(entries, &size.name)).unwrap_or(1.0);
        size.weight * modifier * boost
    };
    pick_weighted(&tables.environment.sizes, weight, roll)
        .map_or_else(|| tables.rules.planets.fallback_size.clone(), |size| size.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(tables: &'a ReferenceTables, key: &'a RollKey, star: &'a str) -> PlanetContext<'a> {
        PlanetContext { tables, key, is_core_system: false, primary_star: Some(star) }
    }

    #[test]
    fn uninhabitable_systems_gain_one_habitable_body_when_the_star_allows() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("fix");
        let mut kinds = vec!["Gas Giant".to_owned(), "Barren".to_owned(), "Ice Giant".to_owned()];
        ensure_habitable_type(&context(&tables, &key, "G"), &mut kinds);
        assert_eq!(kinds.iter().filter(|kind| tables.is_habitable_type(kind)).count(), 1);
    }

    #[test]
    fn degenerate_primaries_never_trigger_the_fix() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("fix");
        let mut kinds = vec!["Barren".to_owned()];
        ensure_habitable_type(&context(&tables, &key, "Neutron"), &mut kinds);
        assert_eq!(kinds, vec!["Barren".to_owned()]);
    }

    #[test]
    fn condition_picks_stay_inside_the_allow_list() {
        let tables = ReferenceTables::builtin();
        let terrestrial = tables.planet_type("Terrestrial").expect("type");
        for step in 0..100 {
            let roll = f64::from(step) / 100.0;
            let name = pick_condition(&tables.environment.atmospheres, &terrestrial.atmosphere_weights, roll)
                .expect("allowed atmosphere");
            assert!(weight_of(&terrestrial.atmosphere_weights, &name).is_some());
        }
    }

    #[test]
    fn weightless_allow_lists_fall_back_to_uniform_picks() {
        let tables = ReferenceTables::builtin();
        let weights = vec![
            WeightedName { name: "Thin".to_owned(), weight: 0.0 },
            WeightedName { name: "Dense".to_owned(), weight: 0.0 },
        ];
        assert_eq!(pick_condition(&tables.environment.atmospheres, &weights, 0.1).as_deref(), Some("Thin"));
        assert_eq!(pick_condition(&tables.environment.atmospheres, &weights, 0.9).as_deref(), Some("Dense"));
    }

    #[test]
    fn habitability_is_the_clamped_product_of_rates() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("rates");
        let context = context(&tables, &key, "G");
        let body = environment_for(&context, &key, "Terrestrial", true);

        assert_eq!(body.atmosphere.as_deref(), Some("Breathable"));
        assert_eq!(body.temperature.as_deref(), Some("Temperate"));
        assert!(body.habitable);
        assert!((body.habitability_rate - 0.9).abs() < 1e-12);
    }

    #[test]
    fn non_habitable_types_have_zero_rate() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("giant");
        let body = environment_for(&context(&tables, &key, "G"), &key, "Gas Giant", false);
        assert!(!body.habitable);
        assert_eq!(body.habitability_rate, 0.0);
    }
}
