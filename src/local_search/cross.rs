//! Cross neighborhood: exchange whole segments between two routes.

use crate::problem::Problem;
use crate::solution::{Route, Solution};

use super::utils::{fan_out, reconstruct_pair, route_pairs, splice_stops};
use super::{Move, Neighbor, NeighborhoodOperator};

pub struct Cross;

impl NeighborhoodOperator for Cross {
    fn name(&self) -> &'static str {
        "cross"
    }

    fn neighbors(&self, problem: &Problem, solution: &Solution, parallel: bool) -> Vec<Neighbor> {
        // Segments span at least two customers; shorter ones are exchanges
        let pairs = route_pairs(solution, |r| r.customer_count() >= 2);

        fan_out(pairs, parallel, |&(r1_idx, r2_idx)| {
            let r1 = solution.route(r1_idx);
            let r2 = solution.route(r2_idx);
            let (n1, n2) = (r1.len(), r2.len());
            let mut neighbors = Vec::new();

            for i in 1..n1 - 2 {
                for j in i + 1..n1 - 1 {
                    for k in 1..n2 - 2 {
                        for m in k + 1..n2 - 1 {
                            if let Some((new_r1, new_r2)) = cross_segments(problem, r1, (i, j), r2, (k, m)) {
                                neighbors.push(Neighbor::new(
                                    solution,
                                    Move::Cross {
                                        route_a: r1_idx,
                                        start_a: i,
                                        end_a: j,
                                        route_b: r2_idx,
                                        start_b: k,
                                        end_b: m,
                                    },
                                    vec![(r1_idx, new_r1), (r2_idx, new_r2)],
                                ));
                            }
                        }
                    }
                }
            }

            neighbors
        })
    }
}

/// Swap visits `seg_a.0..=seg_a.1` of `a` with `seg_b.0..=seg_b.1` of `b`.
pub fn cross_segments(
    problem: &Problem,
    a: &Route,
    seg_a: (usize, usize),
    b: &Route,
    seg_b: (usize, usize),
) -> Option<(Route, Route)> {
    let stops_a = a.stops();
    let stops_b = b.stops();
    let new_a = splice_stops(&stops_a, seg_a.0, seg_a.1, &stops_b[seg_b.0..=seg_b.1]);
    let new_b = splice_stops(&stops_b, seg_b.0, seg_b.1, &stops_a[seg_a.0..=seg_a.1]);
    reconstruct_pair(problem, &new_a, &new_b)
}
