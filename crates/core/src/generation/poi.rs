//! Point-of-interest spawning, pool picks, and jump-gate POIs.

use crate::model::{GlobalLocation, HexCoord, Poi, SectorCoord};
use crate::rng::SeededRng;
use crate::sampler::pick_weighted;
use crate::tables::{ACTIVE_GATE_STATE, JUMP_GATE_TYPE, PoiRules, ReferenceTables};

use super::jump_gate::GateLink;
use super::placement::ClusterCenter;

const ACTIVE_GATE_SUFFIX: &str =
    "It hums with immense power, its internal rings spinning in a blur of light.";
const DORMANT_GATE_SUFFIX: &str =
    "It remains silent and dark, waiting for a key or command to reawaken.";

/// Spawn chance for an empty cell. Without cluster centres this is the flat
/// base chance; with centres it is suppressed near any centre, boosted on
/// cells bridging two centres, and mildly boosted on a single centre's
/// outskirts.
pub(super) fn poi_spawn_chance(coord: HexCoord, centers: &[ClusterCenter], rules: &PoiRules) -> f64 {
    let base = rules.spawn_chance;
    if centers.is_empty() {
        return base;
    }

    let distances: Vec<f64> = centers.iter().map(|center| center.coord.distance(coord)).collect();
    let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
    if nearest < rules.suppression_distance {
        return (base * rules.suppression_factor).clamp(0.0, 1.0);
    }

    let in_band: Vec<f64> =
        distances.iter().copied().filter(|distance| *distance <= rules.outer_band).collect();
    let bridges = in_band.iter().enumerate().any(|(index, left)| {
        in_band[index + 1..].iter().any(|right| (left - right).abs() <= rules.bridge_tolerance)
    });
    if bridges {
        return (base * rules.bridge_factor).clamp(0.0, 1.0);
    }

    if nearest <= rules.outer_band {
        let band_width = (rules.outer_band - rules.suppression_distance).max(f64::EPSILON);
        let closeness = ((rules.outer_band - nearest) / band_width).clamp(0.0, 1.0);
        return (base * (1.0 + rules.outskirts_boost * closeness)).clamp(0.0, 1.0);
    }
    base
}

/// Weighted pick from the POI pool. Colour falls back to the type colour, then
/// to the configured default. `None` only when the pool has no weight.
pub(super) fn generate_poi(
    rng: &mut SeededRng,
    coord: HexCoord,
    sector: SectorCoord,
    tables: &ReferenceTables,
) -> Option<Poi> {
    let template = pick_weighted(&tables.pois.pool, |entry| entry.weight, rng.next_f64())?;
    let poi_type = tables.poi_type(&template.kind);

    let color = template
        .color
        .clone()
        .or_else(|| poi_type.map(|kind| kind.color.clone()))
        .unwrap_or_else(|| tables.rules.pois.fallback_color.clone());
    let base_description = template
        .description
        .clone()
        .or_else(|| poi_type.map(|kind| kind.description.clone()))
        .unwrap_or_default();

    let (name, description) = match (&template.state, template.kind == JUMP_GATE_TYPE) {
        (Some(state), true) => {
            let gate_description = poi_type.map_or(base_description, |kind| kind.description.clone());
            (format!("{state} {JUMP_GATE_TYPE}"), format!("{gate_description} {DORMANT_GATE_SUFFIX}"))
        }
        _ => (template.name.clone(), base_description),
    };

    Some(Poi {
        kind: template.kind.clone(),
        name,
        description,
        color,
        risk: template.risk.clone(),
        state: template.state.clone(),
        destination: None,
        location: coord,
        global_location: GlobalLocation::from(sector),
    })
}

/// Active gate belonging to the stable network. The destination always names
/// the partner sector, whichever end of the link this sector is.
pub(super) fn active_gate_poi(
    coord: HexCoord,
    sector: SectorCoord,
    link: GateLink,
    tables: &ReferenceTables,
) -> Poi {
    let partner = link.partner();
    let gate_rules = &tables.rules.jump_gates;
    Poi {
        kind: JUMP_GATE_TYPE.to_owned(),
        name: format!("{ACTIVE_GATE_STATE} {JUMP_GATE_TYPE}"),
        description: format!(
            "A massive, active structure connecting Sector {sector} to {partner}. {ACTIVE_GATE_SUFFIX}"
        ),
        color: gate_rules.color.clone(),
        risk: Some(gate_rules.risk.clone()),
        state: Some(ACTIVE_GATE_STATE.to_owned()),
        destination: Some(partner),
        location: coord,
        global_location: GlobalLocation::from(sector),
    }
}
