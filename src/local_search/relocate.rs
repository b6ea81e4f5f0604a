//! Relocate neighborhood for local search.

use crate::problem::Problem;
use crate::solution::{Route, Solution};

use super::utils::{fan_out, reconstruct_pair};
use super::{Move, Neighbor, NeighborhoodOperator};

/// Moves one customer into another route, at any position.
pub struct Relocate;

impl NeighborhoodOperator for Relocate {
    fn name(&self) -> &'static str {
        "relocate"
    }

    fn neighbors(&self, problem: &Problem, solution: &Solution, parallel: bool) -> Vec<Neighbor> {
        let pairs = relocation_pairs(solution);

        fan_out(pairs, parallel, |&(r1_idx, r2_idx)| {
            let r1 = solution.route(r1_idx);
            let r2 = solution.route(r2_idx);
            let mut neighbors = Vec::new();

            for i in 1..r1.len() - 1 {
                // Inserting before the return visit appends to the route
                for j in 1..r2.len() {
                    if let Some((new_r1, new_r2)) = relocate_stop(problem, r1, i, r2, j) {
                        neighbors.push(Neighbor::new(
                            solution,
                            Move::Relocate {
                                from_route: r1_idx,
                                from_pos: i,
                                to_route: r2_idx,
                                to_pos: j,
                            },
                            vec![(r1_idx, new_r1), (r2_idx, new_r2)],
                        ));
                    }
                }
            }

            neighbors
        })
    }
}

/// Ordered (source, target) route pairs. Sources serve at least one
/// customer. Idle vehicles are interchangeable, so only the first empty route
/// is a target.
fn relocation_pairs(solution: &Solution) -> Vec<(usize, usize)> {
    let first_empty = solution.routes().iter().position(|r| r.is_empty());
    let targets: Vec<usize> = (0..solution.route_count())
        .filter(|&idx| !solution.route(idx).is_empty() || Some(idx) == first_empty)
        .collect();

    (0..solution.route_count())
        .filter(|&idx| !solution.route(idx).is_empty())
        .flat_map(|source| {
            targets
                .iter()
                .filter(move |&&target| target != source)
                .map(move |&target| (source, target))
        })
        .collect()
}

/// Remove the visit at `i` of `from` and insert it before the visit at `j`
/// of `to`.
pub fn relocate_stop(problem: &Problem, from: &Route, i: usize, to: &Route, j: usize) -> Option<(Route, Route)> {
    let mut stops_from = from.stops();
    let mut stops_to = to.stops();
    let stop = stops_from.remove(i);
    stops_to.insert(j, stop);
    reconstruct_pair(problem, &stops_from, &stops_to)
}
