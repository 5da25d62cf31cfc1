//! Sector orchestration: core system, jump gate, standard systems, POIs.

use tracing::{debug, trace, warn};

use crate::model::{
    GeneratedSector, GlobalLocation, HexCoord, Occupant, SectorCoord, SectorMap, SystemRecord,
};
use crate::request::GenerationRequest;
use crate::rng::SeededRng;
use crate::tables::ReferenceTables;

use super::belts::generate_belts;
use super::biome::biome_for_sector;
use super::core_hex::ideal_core_hex;
use super::density::target_system_count;
use super::jump_gate::JumpGateNetwork;
use super::placement::{CoordinateOrder, order_coordinates};
use super::planets::{PlanetContext, process_planet_bodies};
use super::poi::{active_gate_poi, generate_poi, poi_spawn_chance};
use super::seed::{gate_location_stream, sector_key, sector_stream, system_roll_key};
use super::stations::generate_stations;
use super::system::{SkeletonContext, StarPicker, append_companion_stars, generate_skeleton};

/// Generates one sector at a time against a fixed set of reference tables.
///
/// Holds no per-call state, so a single generator can serve sectors in any
/// order and every call with the same request returns the same snapshot.
pub struct SectorGenerator<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> SectorGenerator<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a ReferenceTables {
        self.tables
    }

    pub fn generate(&self, request: &GenerationRequest) -> GeneratedSector {
        let tables = self.tables;
        let sector = request.sector();
        let grid_size = request.grid_size;
        let biome = biome_for_sector(&request.seed, sector, tables);
        let mut systems = SectorMap::new();

        if grid_size.area() == 0 {
            warn!(%sector, width = grid_size.width, height = grid_size.height, "empty grid; nothing to place");
            return GeneratedSector { sector, grid_size, systems, biome };
        }

        let key = sector_key(&request.seed, sector);
        let mut rng = sector_stream(&request.seed, sector);
        let target = target_system_count(request, &tables.rules, biome.density_multiplier, &mut rng);
        let core = ideal_core_hex(&request.seed, sector, grid_size, &tables.rules.placement);
        let CoordinateOrder { mut coords, centers } = order_coordinates(
            request.distribution_mode,
            grid_size,
            core,
            &mut rng,
            &tables.rules.placement,
        );
        coords.retain(|coord| *coord != core);
        trace!(%sector, target, %core, centers = centers.len(), "coordinate order ready");

        let builder = SystemBuilder {
            tables,
            sector,
            sector_key: &key,
            stars: StarPicker::new(tables, &biome),
        };
        let core_system = builder.build(core, true, &systems, &mut rng);
        systems.place(core, Occupant::System(core_system));

        let gate = JumpGateNetwork::new(&request.seed, &tables.rules.jump_gates).link_for(sector);
        let mut gate_coord = None;
        if let Some(link) = gate {
            if coords.is_empty() {
                debug!(%sector, partner = %link.partner(), "no free cell for the jump gate");
            } else {
                let coord = coords.remove(gate_location_stream(&request.seed, sector).below(coords.len()));
                systems.place(coord, Occupant::Poi(active_gate_poi(coord, sector, link, tables)));
                gate_coord = Some(coord);
            }
        }

        let (system_coords, open_coords) = coords.split_at(target.min(coords.len()));
        for &coord in system_coords {
            let system = builder.build(coord, false, &systems, &mut rng);
            systems.place(coord, Occupant::System(system));
        }
        trace!(%sector, placed = system_coords.len(), "standard systems placed");

        let mut poi_count = 0;
        for &coord in open_coords {
            if rng.next_f64() >= poi_spawn_chance(coord, &centers, &tables.rules.pois) {
                continue;
            }
            if let Some(poi) = generate_poi(&mut rng, coord, sector, tables) {
                poi_count += usize::from(systems.place(coord, Occupant::Poi(poi)));
            }
        }

        debug!(
            %sector,
            seed = %request.seed,
            biome = %biome.name,
            systems = system_coords.len() + 1,
            pois = poi_count,
            gate = ?gate_coord,
            "sector generated"
        );
        GeneratedSector { sector, grid_size, systems, biome }
    }
}

/// Produces fully enriched systems for one sector.
struct SystemBuilder<'a> {
    tables: &'a ReferenceTables,
    sector: SectorCoord,
    sector_key: &'a str,
    stars: StarPicker<'a>,
}

impl SystemBuilder<'_> {
    /// The skeleton draws from the sector stream; everything after it uses
    /// named rolls keyed by the cell and base name.
    fn build(&self, coord: HexCoord, is_core: bool, placed: &SectorMap, rng: &mut SeededRng) -> SystemRecord {
        let tables = self.tables;
        let star_class = if is_core { self.stars.pick_core(rng) } else { self.stars.pick(rng) };
        let skeleton = generate_skeleton(
            &SkeletonContext { tables, coord, is_core, placed },
            star_class,
            rng,
        );

        let key = system_roll_key(self.sector_key, coord, &skeleton.base_name);
        let planet_context = PlanetContext {
            tables,
            key: &key,
            is_core_system: is_core,
            primary_star: Some(skeleton.star.kind.as_str()),
        };
        let bodies = process_planet_bodies(&planet_context, &skeleton.bodies);

        let stars = append_companion_stars(vec![skeleton.star], &key, is_core, tables);
        let stations = generate_stations(&key, bodies.iter().any(|body| body.is_inhabited), tables);
        let belts = generate_belts(&key, &skeleton.name, &tables.rules);

        SystemRecord {
            is_core,
            stars,
            bodies,
            stations,
            belts,
            name: skeleton.name,
            base_name: skeleton.base_name,
            name_prefix: skeleton.name_prefix,
            global_location: GlobalLocation::from(self.sector),
            local_location: coord,
        }
    }
}
