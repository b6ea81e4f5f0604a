//! Segment reversal neighborhood (intra-route 2-opt).

use crate::feasibility::{reconstruct, Reconstruction};
use crate::problem::Problem;
use crate::solution::{Route, Solution};

use super::utils::fan_out;
use super::{Move, Neighbor, NeighborhoodOperator};

/// Reverses a run of consecutive customers inside one route.
pub struct TwoOpt;

impl NeighborhoodOperator for TwoOpt {
    fn name(&self) -> &'static str {
        "2-opt"
    }

    fn neighbors(&self, problem: &Problem, solution: &Solution, parallel: bool) -> Vec<Neighbor> {
        // Need at least two customers to reverse anything
        let routes: Vec<usize> = (0..solution.route_count())
            .filter(|&r| solution.route(r).customer_count() >= 2)
            .collect();

        fan_out(routes, parallel, |&r_idx| {
            let route = solution.route(r_idx);
            let n = route.len();
            let mut neighbors = Vec::new();

            for i in 1..n - 2 {
                for j in i + 1..n - 1 {
                    if let Reconstruction::Feasible(new_route) = reverse_segment(problem, route, i, j) {
                        neighbors.push(Neighbor::new(
                            solution,
                            Move::TwoOpt { route: r_idx, i, j },
                            vec![(r_idx, new_route)],
                        ));
                    }
                }
            }

            neighbors
        })
    }
}

/// Rebuild `route` with visits `i..=j` in reverse order.
pub fn reverse_segment(problem: &Problem, route: &Route, i: usize, j: usize) -> Reconstruction {
    let mut stops = route.stops();
    stops[i..=j].reverse();
    reconstruct(problem, &stops, problem.vehicle_capacity)
}
