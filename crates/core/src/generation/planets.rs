//! Planet post-processing: environment, inhabitation, tags, naming, population.
//!
//! Every decision in this pipeline is a named roll under the system's
//! [`RollKey`], so the result does not depend on how much of the sector stream
//! earlier systems consumed.

mod environment;
mod inhabitation;
mod naming;
mod population;
mod tags;

use crate::model::PlanetBody;
use crate::rng::RollKey;
use crate::tables::ReferenceTables;

use super::system::BodySkeleton;

pub(super) struct PlanetContext<'a> {
    pub(super) tables: &'a ReferenceTables,
    pub(super) key: &'a RollKey,
    pub(super) is_core_system: bool,
    pub(super) primary_star: Option<&'a str>,
}

impl PlanetContext<'_> {
    fn body_key(&self, index: usize) -> RollKey {
        self.key.child(format!("body:{index}"))
    }
}

pub(super) fn process_planet_bodies(
    context: &PlanetContext<'_>,
    skeletons: &[BodySkeleton],
) -> Vec<PlanetBody> {
    let mut kinds: Vec<String> = skeletons.iter().map(|body| body.kind.clone()).collect();
    environment::ensure_habitable_type(context, &mut kinds);

    let core_candidate = context
        .is_core_system
        .then(|| kinds.iter().position(|kind| *kind == context.tables.rules.core.guaranteed_type))
        .flatten();

    let mut bodies = environment::assign_environment(context, &kinds, core_candidate);
    inhabitation::assign_inhabitation(context, &mut bodies, core_candidate);
    tags::assign_tags(context, &mut bodies);
    tags::enforce_colony_rule(context, &mut bodies);
    naming::assign_names(context, &mut bodies);
    population::assign_population(context, &mut bodies);
    bodies
}
