//! Final body names.

use crate::generation::pick_name;
use crate::model::{NamingStyle, PlanetBody};

use super::PlanetContext;

pub(super) fn assign_names(context: &PlanetContext<'_>, bodies: &mut [PlanetBody]) {
    let names = &context.tables.names;
    let rules = &context.tables.rules;
    let key = context.key;

    let sequence = if key.roll("naming_scheme") < rules.systems.planet_greek_naming {
        &names.greek_alphabet
    } else {
        &names.roman_numerals
    };
    let mut secondary_pool = secondary_name_pool(context).into_iter();
    let mut uninhabited = 0;

    for body in bodies.iter_mut() {
        let (name, style) = if body.is_inhabited && body.is_primary_inhabited {
            let suffix = pick_name(&names.primary_planet_suffixes, key.roll("primary_suffix"))
                .unwrap_or(rules.planets.fallback_primary_name.as_str());
            (suffix.to_owned(), NamingStyle::Suffix)
        } else if body.is_inhabited {
            secondary_pool
                .next()
                .unwrap_or_else(|| (rules.planets.fallback_secondary_name.clone(), NamingStyle::Suffix))
        } else {
            uninhabited += 1;
            let name = sequence.get(uninhabited - 1).cloned().unwrap_or_else(|| uninhabited.to_string());
            (name, NamingStyle::Suffix)
        };
        body.name = name;
        body.naming_style = style;
    }
}

/// Prefix and suffix options ordered by a named roll per option, so the order
/// is stable per system and each option is used at most once.
fn secondary_name_pool(context: &PlanetContext<'_>) -> Vec<(String, NamingStyle)> {
    let names = &context.tables.names;
    let mut pool: Vec<(f64, String, NamingStyle)> = names
        .secondary_planet_prefixes
        .iter()
        .map(|name| (name, NamingStyle::Prefix))
        .chain(names.secondary_planet_suffixes.iter().map(|name| (name, NamingStyle::Suffix)))
        .map(|(name, style)| {
            (context.key.roll(&format!("secondary_pool_shuffle:{name}")), name.clone(), style)
        })
        .collect();
    pool.sort_by(|left, right| left.0.total_cmp(&right.0));
    pool.into_iter().map(|(_, name, style)| (name, style)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::rng::RollKey;
    use crate::tables::ReferenceTables;

    fn body(inhabited: bool, primary: bool) -> PlanetBody {
        PlanetBody {
            kind: "Terrestrial".to_owned(),
            size: "Medium".to_owned(),
            atmosphere: None,
            temperature: None,
            habitability_rate: 0.5,
            habitable: true,
            is_inhabited: inhabited,
            is_primary_inhabited: primary,
            is_core_world: false,
            tags: Vec::new(),
            name: String::new(),
            naming_style: NamingStyle::Suffix,
            population: 0,
        }
    }

    #[test]
    fn uninhabited_bodies_are_numbered_in_order() {
        let tables = ReferenceTables::builtin();
        let key = RollKey::new("sequence");
        let context = PlanetContext { tables: &tables, key: &key, is_core_system: false, primary_star: None };
        let mut bodies = vec![body(false, false), body(true, true), body(false, false)];
        assign_names(&context, &mut bodies);

        let greek = &tables.names.greek_alphabet;
        let roman = &tables.names.roman_numerals;
        let expected = if bodies[0].name == greek[0] { greek } else { roman };
        assert_eq!(bodies[0].name, expected[0]);
        assert_eq!(bodies[2].name, expected[1]);
        assert!(tables.names.primary_planet_suffixes.contains(&bodies[1].name));
    }

    #[test]
    fn secondary_names_are_unique_then_fall_back() {
        let mut tables = ReferenceTables::builtin();
        tables.names.secondary_planet_prefixes = vec!["New".to_owned()];
        tables.names.secondary_planet_suffixes = vec!["Landing".to_owned()];
        let key = RollKey::new("secondary");
        let context = PlanetContext { tables: &tables, key: &key, is_core_system: false, primary_star: None };
        let mut bodies = vec![body(true, true), body(true, false), body(true, false), body(true, false)];
        assign_names(&context, &mut bodies);

        let secondary: BTreeSet<&str> = bodies[1..3].iter().map(|body| body.name.as_str()).collect();
        assert_eq!(secondary, BTreeSet::from(["New", "Landing"]));
        let prefixed = bodies.iter().find(|body| body.name == "New").expect("prefix option used");
        assert_eq!(prefixed.naming_style, NamingStyle::Prefix);
        assert_eq!(bodies[3].name, tables.rules.planets.fallback_secondary_name);
    }

    #[test]
    fn exhausted_sequences_count_numerically() {
        let mut tables = ReferenceTables::builtin();
        tables.names.greek_alphabet = vec!["Alpha".to_owned()];
        tables.names.roman_numerals = vec!["I".to_owned()];
        let key = RollKey::new("overflow");
        let context = PlanetContext { tables: &tables, key: &key, is_core_system: false, primary_star: None };
        let mut bodies = vec![body(false, false), body(false, false), body(false, false)];
        assign_names(&context, &mut bodies);
        assert_eq!(bodies[1].name, "2");
        assert_eq!(bodies[2].name, "3");
    }
}
