//! Settlement population.

use crate::model::PlanetBody;
use crate::rng::RollKey;

use super::PlanetContext;

pub(super) fn assign_population(context: &PlanetContext<'_>, bodies: &mut [PlanetBody]) {
    for (index, body) in bodies.iter_mut().enumerate() {
        let key = context.body_key(index).child("pop");
        body.population = population_for(context, &key, body);
    }
}

/// `base * sizeFactor * rate`, boosted for core systems. A tag with a
/// population range replaces that value outright; otherwise tag modifiers
/// and a variance roll apply. Floored and clamped to the cap.
fn population_for(context: &PlanetContext<'_>, key: &RollKey, body: &PlanetBody) -> u64 {
    if !body.is_inhabited {
        return 0;
    }
    let tables = context.tables;
    let rules = &tables.rules.planets;

    let size_factor = tables.size(&body.size).map_or(1.0, |size| size.population_factor);
    let mut population = rules.base_population * size_factor * body.habitability_rate;
    if context.is_core_system {
        population *= tables.rules.core.population_multiplier;
    }

    match body.tags.iter().find_map(|tag| tag.population_range) {
        Some(range) => {
            let span = range.max.saturating_sub(range.min) as f64 + 1.0;
            population = (key.roll("pop_roll") * span).floor() + range.min as f64;
        }
        None => {
            for modifier in body.tags.iter().filter_map(|tag| tag.population_modifier) {
                population *= modifier;
            }
            population *= rules.population_variance_base
                + key.roll("pop_variance") * rules.population_variance_range;
        }
    }

    let cap = rules.population_cap;
    if population.is_finite() && population > 0.0 {
        (population.floor() as u64).min(cap)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamingStyle, PlanetTag};
    use crate::tables::{PopulationRange, ReferenceTables};

    fn settled(size: &str, tags: Vec<PlanetTag>) -> PlanetBody {
        PlanetBody {
            kind: "Terrestrial".to_owned(),
            size: size.to_owned(),
            atmosphere: None,
            temperature: None,
            habitability_rate: 1.0,
            habitable: true,
            is_inhabited: true,
            is_primary_inhabited: true,
            is_core_world: false,
            tags,
            name: String::new(),
            naming_style: NamingStyle::Suffix,
            population: 0,
        }
    }

    fn tag(name: &str, modifier: Option<f64>, range: Option<PopulationRange>) -> PlanetTag {
        PlanetTag {
            name: name.to_owned(),
            description: String::new(),
            population_modifier: modifier,
            population_range: range,
        }
    }

    #[test]
    fn uninhabited_bodies_have_no_population() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("empty");
        let context = PlanetContext { tables: &tables, key: &key, is_core_system: false, primary_star: None };
        let mut body = settled("Medium", Vec::new());
        body.is_inhabited = false;
        assert_eq!(population_for(&context, &key, &body), 0);
    }

    #[test]
    fn variance_keeps_population_within_its_band() {
        let tables = ReferenceTables::builtin();
        let rules = &tables.rules.planets;
        for index in 0..100 {
            let key = RollKey::new(format!("band:{index}"));
            let context =
                PlanetContext { tables: &tables, key: &key, is_core_system: false, primary_star: None };
            let population = population_for(&context, &key, &settled("Medium", Vec::new())) as f64;
            let low = rules.base_population * rules.population_variance_base;
            let high = rules.base_population
                * (rules.population_variance_base + rules.population_variance_range);
            assert!(population >= low.floor() && population <= high, "{population}");
        }
    }

    #[test]
    fn population_ranges_override_modifiers() {
        let tables = ReferenceTables::builtin();
        let tags = vec![
            tag("Capital", Some(2.0), None),
            tag("Research Outpost", None, Some(PopulationRange { min: 200, max: 5_000 })),
        ];
        for index in 0..100 {
            let key = RollKey::new(format!("range:{index}"));
            let context =
                PlanetContext { tables: &tables, key: &key, is_core_system: true, primary_star: None };
            let population = population_for(&context, &key, &settled("Huge", tags.clone()));
            assert!((200..=5_000).contains(&population), "{population}");
        }
    }

    #[test]
    fn huge_populations_are_clamped_to_the_cap() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("cap");
        let context = PlanetContext { tables: &tables, key: &key, is_core_system: true, primary_star: None };
        let tags = vec![tag("Ecumenopolis", Some(8.0), None), tag("Hive World", Some(5.0), None)];
        let population = population_for(&context, &key, &settled("Huge", tags));
        assert_eq!(population, tables.rules.planets.population_cap);
    }
}
