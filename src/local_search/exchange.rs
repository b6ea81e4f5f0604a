//! Exchange neighborhood: swap two customers served by different routes.

use crate::problem::Problem;
use crate::solution::{Route, Solution};

use super::utils::{fan_out, reconstruct_pair, route_pairs};
use super::{Move, Neighbor, NeighborhoodOperator};

pub struct Exchange;

impl NeighborhoodOperator for Exchange {
    fn name(&self) -> &'static str {
        "exchange"
    }

    fn neighbors(&self, problem: &Problem, solution: &Solution, parallel: bool) -> Vec<Neighbor> {
        let pairs = route_pairs(solution, |r| !r.is_empty());

        fan_out(pairs, parallel, |&(r1_idx, r2_idx)| {
            let r1 = solution.route(r1_idx);
            let r2 = solution.route(r2_idx);
            let mut neighbors = Vec::new();

            for i in 1..r1.len() - 1 {
                for j in 1..r2.len() - 1 {
                    if let Some((new_r1, new_r2)) = exchange_stops(problem, r1, i, r2, j) {
                        neighbors.push(Neighbor::new(
                            solution,
                            Move::Exchange {
                                route_a: r1_idx,
                                pos_a: i,
                                route_b: r2_idx,
                                pos_b: j,
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

/// Swap the visit at `i` of `a` with the visit at `j` of `b`.
pub fn exchange_stops(problem: &Problem, a: &Route, i: usize, b: &Route, j: usize) -> Option<(Route, Route)> {
    let mut stops_a = a.stops();
    let mut stops_b = b.stops();
    std::mem::swap(&mut stops_a[i], &mut stops_b[j]);
    reconstruct_pair(problem, &stops_a, &stops_b)
}
