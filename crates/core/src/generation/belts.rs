//! Asteroid and debris belts.

use crate::model::Belt;
use crate::rng::RollKey;
use crate::sampler::pick_weighted;
use crate::tables::GenerationRules;

/// At most one belt, named `"<system> <first word of type>"`.
pub(super) fn generate_belts(key: &RollKey, system_name: &str, rules: &GenerationRules) -> Vec<Belt> {
    let belts = &rules.belts;
    if key.roll("has_belt") >= belts.chance {
        return Vec::new();
    }
    let kind = pick_weighted(&belts.types, |entry| entry.weight, key.roll("belt_type"))
        .map_or(belts.fallback_type.as_str(), |entry| entry.name.as_str());
    let short = kind.split_whitespace().next().unwrap_or(kind);
    vec![Belt { name: format!("{system_name} {short}"), kind: kind.to_owned() }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::ReferenceTables;

    #[test]
    fn certain_belts_are_named_after_the_system() {
        let mut rules = ReferenceTables::builtin().rules;
        rules.belts.chance = 1.0;
        for index in 0..50 {
            let belts = generate_belts(&RollKey::new(format!("belt:{index}")), "Aldara", &rules);
            assert_eq!(belts.len(), 1);
            let belt = &belts[0];
            assert!(rules.belts.types.iter().any(|entry| entry.name == belt.kind));
            let first_word = belt.kind.split(' ').next().expect("non-empty type");
            assert_eq!(belt.name, format!("Aldara {first_word}"));
        }
    }

    #[test]
    fn zero_chance_means_no_belts() {
        let mut rules = ReferenceTables::builtin().rules;
        rules.belts.chance = 0.0;
        assert!(generate_belts(&RollKey::new("never"), "Aldara", &rules).is_empty());
    }

    #[test]
    fn weightless_types_use_the_fallback() {
        let mut rules = ReferenceTables::builtin().rules;
        rules.belts.chance = 1.0;
        rules.belts.types.clear();
        let belts = generate_belts(&RollKey::new("fallback"), "Veg", &rules);
        assert_eq!(belts, vec![Belt { name: "Veg Asteroid".to_owned(), kind: "Asteroid Belt".to_owned() }]);
    }
}
