//! Tag selection and the colony rule.

use crate::model::{PlanetBody, PlanetTag};
use crate::sampler::RemainingPool;
use crate::tables::TagDefinition;

use super::PlanetContext;

pub(super) fn assign_tags(context: &PlanetContext<'_>, bodies: &mut [PlanetBody]) {
    for (index, body) in bodies.iter_mut().enumerate() {
        body.tags = pick_tags(context, index, body);
    }
}

fn pick_tags(context: &PlanetContext<'_>, index: usize, body: &PlanetBody) -> Vec<PlanetTag> {
    let rules = &context.tables.rules;
    let eligible: Vec<&TagDefinition> = context
        .tables
        .tags
        .iter()
        .filter(|tag| meets_requirements(tag, body))
        .filter(|tag| !body.is_core_world || !rules.core.excluded_tags.contains(&tag.name))
        .collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let key = context.body_key(index).child("tags");
    let count = if key.roll("count") < rules.planets.tag_count_threshold { 1 } else { 2 };
    let mut pool = RemainingPool::new(&eligible);
    let mut picked = Vec::with_capacity(count);

    for pick in 0..count {
        let roll = key.roll(&format!("pick:{pick}"));
        let tag = if pick == 0 && body.is_core_world {
            pool.take_uniform_where(roll, |tag| tag.is_core_specific()).or_else(|| pool.take_uniform(roll))
        } else {
            pool.take_uniform(roll)
        };
        let Some(tag) = tag else {
            break;
        };
        pool.discard_where(|other| tag.excludes(&other.name) || other.excludes(&tag.name));
        picked.push(PlanetTag::from(*tag));
    }
    picked
}

fn meets_requirements(tag: &TagDefinition, body: &PlanetBody) -> bool {
    let requirements = &tag.requirements;
    requirements.inhabited.is_none_or(|inhabited| inhabited == body.is_inhabited)
        && requirements.habitable.is_none_or(|habitable| habitable == body.habitable)
        && requirements.types.as_ref().is_none_or(|types| types.contains(&body.kind))
        && requirements.core_world.is_none_or(|core_world| core_world == body.is_core_world)
}

/// A colony primary is the only settlement in its system. Demoted bodies also
/// lose tags that require inhabitation.
pub(super) fn enforce_colony_rule(context: &PlanetContext<'_>, bodies: &mut [PlanetBody]) {
    let colony_tag = &context.tables.rules.planets.colony_tag;
    let colony_primary = bodies.iter().any(|body| body.is_primary_inhabited && body.has_tag(colony_tag));
    if !colony_primary {
        return;
    }

    for body in bodies.iter_mut().filter(|body| !body.is_primary_inhabited) {
        body.is_inhabited = false;
        body.population = 0;
        body.tags.retain(|tag| {
            context.tables.tag(&tag.name).is_none_or(|definition| definition.requirements.inhabited != Some(true))
        });
    }
}
