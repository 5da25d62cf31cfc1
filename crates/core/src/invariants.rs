//! Post-generation consistency checks.
//!
//! Generation never fails, so these checks exist for tests and the fuzz tool:
//! they walk a finished sector and report the first rule it breaks.

use thiserror::Error;

use crate::model::{GeneratedSector, HexCoord};
use crate::tables::{ACTIVE_GATE_STATE, JUMP_GATE_TYPE, ReferenceTables};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("expected exactly one core system, found {0}")]
    CoreCount(usize),
    #[error("core system at {coord} has excluded star type `{star}`")]
    CoreStar { coord: HexCoord, star: String },
    #[error("system at {coord} has {count} inhabited bodies (max {max})")]
    TooManyInhabited { coord: HexCoord, count: usize, max: usize },
    #[error("system at {coord} has {count} primary settlements")]
    MultiplePrimaries { coord: HexCoord, count: usize },
    #[error("body `{body}` at {coord} is inhabited with zero habitability")]
    UninhabitableSettlement { coord: HexCoord, body: String },
    #[error("body `{body}` at {coord} has population {population} without being inhabited")]
    PhantomPopulation { coord: HexCoord, body: String, population: u64 },
    #[error("colony system at {coord} has another settled body `{body}`")]
    ColonyRule { coord: HexCoord, body: String },
    #[error("body `{body}` at {coord} exceeds the population cap ({population})")]
    PopulationCap { coord: HexCoord, body: String, population: u64 },
    #[error("{kind} `{name}` stored at {stored} reports location {reported}")]
    Misplaced { kind: &'static str, name: String, stored: HexCoord, reported: HexCoord },
    #[error("cell {coord} lies outside the {width}x{height} grid")]
    OutOfGrid { coord: HexCoord, width: u32, height: u32 },
    #[error("active jump gate at {coord} has no destination")]
    GateWithoutDestination { coord: HexCoord },
    #[error("system at {coord} has stations but no settled body")]
    UnsettledStations { coord: HexCoord },
}

/// Checks every structural rule a generated sector must satisfy.
pub fn check_sector_invariants(
    sector: &GeneratedSector,
    tables: &ReferenceTables,
) -> Result<(), InvariantViolation> {
    let rules = &tables.rules;
    let grid = sector.grid_size;

    let core_count = sector.systems.systems().filter(|(_, system)| system.is_core).count();
    if core_count != 1 && grid.area() > 0 {
        return Err(InvariantViolation::CoreCount(core_count));
    }

    for (coord, occupant) in sector.systems.iter() {
        let inside = coord.q >= 0
            && coord.r >= 0
            && (coord.q as u32) < grid.width
            && (coord.r as u32) < grid.height;
        if !inside {
            return Err(InvariantViolation::OutOfGrid { coord, width: grid.width, height: grid.height });
        }

        if let Some(poi) = occupant.as_poi() {
            if poi.location != coord {
                return Err(InvariantViolation::Misplaced {
                    kind: "poi",
                    name: poi.name.clone(),
                    stored: coord,
                    reported: poi.location,
                });
            }
            if poi.kind == JUMP_GATE_TYPE
                && poi.state.as_deref() == Some(ACTIVE_GATE_STATE)
                && poi.destination.is_none()
            {
                return Err(InvariantViolation::GateWithoutDestination { coord });
            }
            continue;
        }
        let Some(system) = occupant.as_system() else {
            continue;
        };

        if system.local_location != coord {
            return Err(InvariantViolation::Misplaced {
                kind: "system",
                name: system.name.clone(),
                stored: coord,
                reported: system.local_location,
            });
        }
        if system.is_core {
            if let Some(star) = system.primary_star().filter(|star| rules.is_core_excluded_star(&star.kind)) {
                return Err(InvariantViolation::CoreStar { coord, star: star.kind.clone() });
            }
        }

        let inhabited = system.inhabited_count();
        if inhabited > rules.planets.max_inhabited_planets {
            return Err(InvariantViolation::TooManyInhabited {
                coord,
                count: inhabited,
                max: rules.planets.max_inhabited_planets,
            });
        }
        let primaries = system.bodies.iter().filter(|body| body.is_primary_inhabited).count();
        if primaries > 1 {
            return Err(InvariantViolation::MultiplePrimaries { coord, count: primaries });
        }
        if !system.stations.is_empty() && inhabited == 0 {
            return Err(InvariantViolation::UnsettledStations { coord });
        }

        let colony = system
            .bodies
            .iter()
            .any(|body| body.is_primary_inhabited && body.has_tag(&rules.planets.colony_tag));

        for body in &system.bodies {
            if body.is_inhabited && body.habitability_rate == 0.0 {
                return Err(InvariantViolation::UninhabitableSettlement { coord, body: body.name.clone() });
            }
            if !body.is_inhabited && body.population > 0 {
                return Err(InvariantViolation::PhantomPopulation {
                    coord,
                    body: body.name.clone(),
                    population: body.population,
                });
            }
            if colony && !body.is_primary_inhabited && (body.is_inhabited || body.population > 0) {
                return Err(InvariantViolation::ColonyRule { coord, body: body.name.clone() });
            }
            if body.population > rules.planets.population_cap {
                return Err(InvariantViolation::PopulationCap {
                    coord,
                    body: body.name.clone(),
                    population: body.population,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_sector;
    use crate::model::{Occupant, SectorMap, SystemRecord};
    use crate::request::{GenerationRequest, GridSize};

    fn sector() -> (GeneratedSector, ReferenceTables) {
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::preset("INVARIANTS", GridSize::new(10, 8), "dense");
        (generate_sector(&request, &tables), tables)
    }

    #[test]
    fn generated_sectors_pass() {
        let (sector, tables) = sector();
        assert_eq!(check_sector_invariants(&sector, &tables), Ok(()));
    }

    #[test]
    fn a_second_core_is_reported() {
        let (mut sector, tables) = sector();
        let (coord, system) = sector
            .systems
            .systems()
            .find(|(_, system)| !system.is_core)
            .map(|(coord, system)| (coord, system.clone()))
            .expect("standard system");
        let mut rebuilt = SectorMap::new();
        for (cell, occupant) in sector.systems.iter() {
            if cell != coord {
                rebuilt.place(cell, occupant.clone());
            }
        }
        rebuilt.place(coord, Occupant::System(SystemRecord { is_core: true, ..system }));
        sector.systems = rebuilt;

        assert_eq!(check_sector_invariants(&sector, &tables), Err(InvariantViolation::CoreCount(2)));
    }
}
