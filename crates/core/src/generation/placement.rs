//! Coordinate ordering strategies: uniform shuffle and core-anchored clustering.

use std::cmp::Ordering;

use crate::model::HexCoord;
use crate::request::{DistributionMode, GridSize};
use crate::rng::SeededRng;
use crate::tables::PlacementRules;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ClusterCenter {
    pub(super) coord: HexCoord,
    pub(super) is_core: bool,
}

pub(super) struct CoordinateOrder {
    pub(super) coords: Vec<HexCoord>,
    /// Empty for uniform placement.
    pub(super) centers: Vec<ClusterCenter>,
}

pub(super) fn order_coordinates(
    mode: DistributionMode,
    grid_size: GridSize,
    core: HexCoord,
    rng: &mut SeededRng,
    rules: &PlacementRules,
) -> CoordinateOrder {
    match mode {
        DistributionMode::Uniform => {
            let mut coords = all_coordinates(grid_size);
            rng.shuffle(&mut coords);
            CoordinateOrder { coords, centers: Vec::new() }
        }
        DistributionMode::Clustered => {
            let centers = pick_cluster_centers(grid_size, core, rng, rules);
            let coords = clustered_order(grid_size, &centers, rng, rules);
            CoordinateOrder { coords, centers }
        }
    }
}

/// Every cell, q-major.
pub(super) fn all_coordinates(grid_size: GridSize) -> Vec<HexCoord> {
    let width = grid_size.width as i32;
    let height = grid_size.height as i32;
    (0..width).flat_map(|q| (0..height).map(move |r| HexCoord::new(q, r))).collect()
}

/// The core plus 1..=N extra centres kept at least `ratio * max(w, h)` apart.
/// Candidates that land too close are dropped; attempts are bounded.
fn pick_cluster_centers(
    grid_size: GridSize,
    core: HexCoord,
    rng: &mut SeededRng,
    rules: &PlacementRules,
) -> Vec<ClusterCenter> {
    let extra_wanted = rng.range_inclusive(rules.min_extra_centers, rules.max_extra_centers);
    let min_separation =
        f64::from(grid_size.width.max(grid_size.height)) * rules.min_center_separation_ratio;

    let mut centers = vec![ClusterCenter { coord: core, is_core: true }];
    for _ in 0..extra_wanted * rules.center_attempts_per_center {
        if centers.len() > extra_wanted as usize {
            break;
        }
        let candidate = HexCoord::new(
            rng.below(grid_size.width as usize) as i32,
            rng.below(grid_size.height as usize) as i32,
        );
        if centers.iter().all(|center| center.coord.distance(candidate) >= min_separation) {
            centers.push(ClusterCenter { coord: candidate, is_core: false });
        }
    }
    centers
}

/// Highest falloff weight over all centres; the core falloff is shallower.
pub(super) fn gravity_score(coord: HexCoord, centers: &[ClusterCenter], rules: &PlacementRules) -> f64 {
    centers
        .iter()
        .map(|center| {
            let falloff = if center.is_core { rules.core_falloff } else { rules.center_falloff };
            falloff.powf(center.coord.distance(coord))
        })
        .fold(0.0, f64::max)
}

/// Weighted randomized sort: each cell draws `roll * score` once and cells are
/// ordered by that key, highest first. Ties keep q-major order.
fn clustered_order(
    grid_size: GridSize,
    centers: &[ClusterCenter],
    rng: &mut SeededRng,
    rules: &PlacementRules,
) -> Vec<HexCoord> {
    let mut keyed: Vec<(f64, HexCoord)> = all_coordinates(grid_size)
        .into_iter()
        .map(|coord| (rng.next_f64() * gravity_score(coord, centers, rules), coord))
        .collect();
    keyed.sort_by(|left, right| descending(left.0, right.0));
    keyed.into_iter().map(|(_, coord)| coord).collect()
}

fn descending(left: f64, right: f64) -> Ordering {
    right.total_cmp(&left)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::tables::ReferenceTables;

    fn rules() -> PlacementRules {
        ReferenceTables::builtin().rules.placement
    }

    #[test]
    fn uniform_order_is_a_permutation_of_the_grid() {
        let grid = GridSize::new(7, 5);
        let mut rng = SeededRng::new(11);
        let order =
            order_coordinates(DistributionMode::Uniform, grid, HexCoord::new(3, 2), &mut rng, &rules());
        assert!(order.centers.is_empty());
        let unique: BTreeSet<HexCoord> = order.coords.iter().copied().collect();
        assert_eq!(unique.len(), 35);
        assert_eq!(order.coords.len(), 35);
    }

    #[test]
    fn clustered_order_keeps_the_core_as_first_center() {
        let grid = GridSize::new(20, 20);
        let core = HexCoord::new(10, 10);
        let mut rng = SeededRng::new(5);
        let order = order_coordinates(DistributionMode::Clustered, grid, core, &mut rng, &rules());

        assert_eq!(order.centers[0], ClusterCenter { coord: core, is_core: true });
        assert!((2..=4).contains(&order.centers.len()));
        assert_eq!(order.coords.len(), 400);
    }

    #[test]
    fn cluster_centers_respect_minimum_separation() {
        let grid = GridSize::new(30, 18);
        let rules = rules();
        let min_separation = 30.0 * rules.min_center_separation_ratio;
        for seed in 0..40 {
            let mut rng = SeededRng::new(seed);
            let centers = pick_cluster_centers(grid, HexCoord::new(15, 9), &mut rng, &rules);
            for (index, left) in centers.iter().enumerate() {
                for right in &centers[index + 1..] {
                    assert!(left.coord.distance(right.coord) >= min_separation);
                }
            }
        }
    }

    #[test]
    fn clustered_order_front_loads_cells_near_the_core() {
        let grid = GridSize::new(24, 24);
        let core = HexCoord::new(12, 12);
        let rules = rules();
        let mut near_total = 0.0;
        let mut far_total = 0.0;
        for seed in 0..10 {
            let mut rng = SeededRng::new(seed);
            let order = order_coordinates(DistributionMode::Clustered, grid, core, &mut rng, &rules);
            let head = &order.coords[..40];
            near_total += head.iter().map(|coord| coord.distance(core)).sum::<f64>();
            let tail = &order.coords[order.coords.len() - 40..];
            far_total += tail.iter().map(|coord| coord.distance(core)).sum::<f64>();
        }
        assert!(near_total < far_total);
    }

    #[test]
    fn core_gravity_outweighs_secondary_centres_at_equal_distance() {
        let rules = rules();
        let centers = [
            ClusterCenter { coord: HexCoord::new(0, 0), is_core: true },
            ClusterCenter { coord: HexCoord::new(10, 0), is_core: false },
        ];
        let near_core = gravity_score(HexCoord::new(2, 0), &centers, &rules);
        let near_other = gravity_score(HexCoord::new(8, 0), &centers, &rules);
        assert!(near_core > near_other);
    }
}
