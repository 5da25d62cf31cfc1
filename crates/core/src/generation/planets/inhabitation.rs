//! Primary and secondary settlement selection.

use crate::model::PlanetBody;
use crate::rng::index_for_roll;

use super::PlanetContext;

/// Candidates are habitable bodies with a positive rate, shuffled by named
/// rolls. The first is the primary settlement; a core-world candidate is
/// always moved to the front. Each further candidate settles with chance
/// `base / inhabited_so_far` until the cap is reached.
pub(super) fn assign_inhabitation(
    context: &PlanetContext<'_>,
    bodies: &mut [PlanetBody],
    core_candidate: Option<usize>,
) {
    let mut candidates: Vec<usize> = bodies
        .iter()
        .enumerate()
        .filter(|(_, body)| body.habitable && body.habitability_rate > 0.0)
        .map(|(index, _)| index)
        .collect();

    for position in (1..candidates.len()).rev() {
        let swap = index_for_roll(context.key.roll(&format!("inhabit_shuffle:{position}")), position + 1);
        candidates.swap(position, swap);
    }
    if let Some(core) = core_candidate {
        if let Some(position) = candidates.iter().position(|index| *index == core) {
            let index = candidates.remove(position);
            candidates.insert(0, index);
        }
    }

    let Some((&primary, rest)) = candidates.split_first() else {
        return;
    };
    let primary_body = &mut bodies[primary];
    primary_body.is_inhabited = true;
    primary_body.is_primary_inhabited = true;
    primary_body.is_core_world = context.is_core_system;

    let rules = &context.tables.rules;
    let base_chance =
        if context.is_core_system { rules.core.inhabit_chance } else { rules.planets.inhabit_chance };
    let mut inhabited = 1;
    for &index in rest {
        if inhabited >= rules.planets.max_inhabited_planets {
            break;
        }
        let chance = base_chance / inhabited as f64;
        if context.key.roll(&format!("inhabited_chance:{index}")) < chance {
            bodies[index].is_inhabited = true;
            inhabited += 1;
        }
    }
}
