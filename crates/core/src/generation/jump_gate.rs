//! Stateless inter-sector jump-gate network.
//!
//! Every answer is recomputed from `(seed, sector)`; nothing is stored between
//! calls. A sector is a gate origin when it clears a base chance and its
//! priority beats every sector within the suppression radius. Because that
//! radius covers the full gate reach, no origin can be another origin's
//! destination, so both ends of a link agree without coordination.

use std::f64::consts::TAU;

use crate::model::SectorCoord;
use crate::rng::hash_to_unit;
use crate::tables::JumpGateRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateLink {
    Origin { destination: SectorCoord },
    Target { source: SectorCoord },
}

impl GateLink {
    pub fn partner(self) -> SectorCoord {
        match self {
            GateLink::Origin { destination } => destination,
            GateLink::Target { source } => source,
        }
    }
}

pub struct JumpGateNetwork<'a> {
    seed: &'a str,
    rules: &'a JumpGateRules,
}

impl<'a> JumpGateNetwork<'a> {
    pub fn new(seed: &'a str, rules: &'a JumpGateRules) -> Self {
        Self { seed, rules }
    }

    pub fn priority(&self, sector: SectorCoord) -> f64 {
        self.roll(sector, "gate_priority")
    }

    /// Higher priority wins; exact ties go to the lexicographically smaller
    /// `(q, r)`.
    pub fn outranks(&self, left: SectorCoord, right: SectorCoord) -> bool {
        let (left_priority, right_priority) = (self.priority(left), self.priority(right));
        left_priority > right_priority || (left_priority == right_priority && left < right)
    }

    /// Passes the base chance and is a strict local maximum of priority.
    pub fn is_candidate(&self, sector: SectorCoord) -> bool {
        if self.roll(sector, "gate_base") >= self.rules.base_chance {
            return false;
        }
        square(sector, self.rules.suppression_radius)
            .filter(|other| *other != sector)
            .all(|other| self.outranks(sector, other))
    }

    /// Seeded distance in `min..=max` and angle, rounded to a sector offset.
    pub fn destination(&self, origin: SectorCoord) -> SectorCoord {
        let span = f64::from(self.rules.max_distance - self.rules.min_distance + 1);
        let distance = f64::from(self.rules.min_distance)
            + (self.roll(origin, "gate_distance") * span).floor();
        let angle = self.roll(origin, "gate_angle") * TAU;

        let dq = (angle.cos() * distance).round() as i32;
        let dr = (angle.sin() * distance).round() as i32;
        let (dq, dr) = if dq == 0 && dr == 0 { (1, 0) } else { (dq, dr) };
        SectorCoord::new(origin.q + dq, origin.r + dr)
    }

    /// The gate role of `sector`, if any.
    ///
    /// Candidates contesting the same destination are resolved in favour of
    /// the higher priority; a losing candidate has no gate.
    pub fn link_for(&self, sector: SectorCoord) -> Option<GateLink> {
        if self.is_candidate(sector) {
            let destination = self.destination(sector);
            return (self.winning_origin(destination) == Some(sector))
                .then_some(GateLink::Origin { destination });
        }
        self.winning_origin(sector).map(|source| GateLink::Target { source })
    }

    /// Highest-ranked candidate within reach whose destination is `target`.
    fn winning_origin(&self, target: SectorCoord) -> Option<SectorCoord> {
        square(target, self.rules.max_distance)
            .filter(|origin| *origin != target)
            .filter(|origin| self.is_candidate(*origin) && self.destination(*origin) == target)
            .reduce(|best, next| if self.outranks(next, best) { next } else { best })
    }

    fn roll(&self, sector: SectorCoord, label: &str) -> f64 {
        hash_to_unit(&format!("{}|{label}|{},{}", self.seed, sector.q, sector.r))
    }
}

/// Sectors within Chebyshev distance `radius`, q-major.
fn square(center: SectorCoord, radius: i32) -> impl Iterator<Item = SectorCoord> {
    (-radius..=radius).flat_map(move |dq| {
        (-radius..=radius).map(move |dr| SectorCoord::new(center.q + dq, center.r + dr))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::ReferenceTables;

    fn chebyshev(a: SectorCoord, b: SectorCoord) -> i32 {
        (a.q - b.q).abs().max((a.r - b.r).abs())
    }

    #[test]
    fn destinations_stay_within_configured_reach() {
        let rules = ReferenceTables::builtin().rules.jump_gates;
        let network = JumpGateNetwork::new("reach", &rules);
        for q in -6..=6 {
            for r in -6..=6 {
                let origin = SectorCoord::new(q, r);
                let destination = network.destination(origin);
                let reach = chebyshev(origin, destination);
                assert!(reach >= 1 && reach <= rules.max_distance, "{origin} -> {destination}");
            }
        }
    }

    #[test]
    fn tie_break_prefers_the_smaller_coordinate() {
        let rules = ReferenceTables::builtin().rules.jump_gates;
        let network = JumpGateNetwork::new("tie", &rules);
        let sector = SectorCoord::new(1, 1);
        assert!(!network.outranks(sector, sector));
        let (a, b) = (SectorCoord::new(0, 5), SectorCoord::new(1, -5));
        assert_ne!(network.outranks(a, b), network.outranks(b, a));
    }

    #[test]
    fn links_are_bidirectional_across_a_region() {
        let rules = ReferenceTables::builtin().rules.jump_gates;
        let mut origins = 0;
        for seed in ["GATES_A", "GATES_B", "GATES_C"] {
            let network = JumpGateNetwork::new(seed, &rules);
            for q in -12..=12 {
                for r in -12..=12 {
                    let sector = SectorCoord::new(q, r);
                    match network.link_for(sector) {
                        Some(GateLink::Origin { destination }) => {
                            origins += 1;
                            assert_eq!(
                                network.link_for(destination),
                                Some(GateLink::Target { source: sector }),
                                "{seed}: {sector} -> {destination} is not answered"
                            );
                        }
                        Some(GateLink::Target { source }) => {
                            assert_eq!(
                                network.link_for(source),
                                Some(GateLink::Origin { destination: sector }),
                                "{seed}: {sector} claims source {source}"
                            );
                        }
                        None => {}
                    }
                }
            }
        }
        assert!(origins > 0, "expected at least one gate across three seeded regions");
    }

    #[test]
    fn candidates_are_never_within_suppression_radius_of_each_other() {
        let rules = ReferenceTables::builtin().rules.jump_gates;
        let network = JumpGateNetwork::new("spacing", &rules);
        let candidates: Vec<SectorCoord> = (-15..=15)
            .flat_map(|q| (-15..=15).map(move |r| SectorCoord::new(q, r)))
            .filter(|sector| network.is_candidate(*sector))
            .collect();
        for (index, left) in candidates.iter().enumerate() {
            for right in &candidates[index + 1..] {
                assert!(chebyshev(*left, *right) > rules.suppression_radius);
            }
        }
    }

    #[test]
    fn a_zero_base_chance_disables_the_network() {
        let mut rules = ReferenceTables::builtin().rules.jump_gates;
        rules.base_chance = 0.0;
        let network = JumpGateNetwork::new("off", &rules);
        for q in -3..=3 {
            assert_eq!(network.link_for(SectorCoord::new(q, 0)), None);
        }
    }
}
