//! Utility functions for local search operations.

use crate::feasibility::reconstruct;
use crate::problem::Problem;
use crate::solution::{Route, Solution, Stop};
use itertools::Itertools;
use rayon::prelude::*;

use super::Neighbor;

/// Evaluate `generate` for every work item and concatenate the results in
/// item order, on the rayon pool when `parallel` is set.
pub fn fan_out<T, F>(items: Vec<T>, parallel: bool, generate: F) -> Vec<Neighbor>
where
    T: Send + Sync,
    F: Fn(&T) -> Vec<Neighbor> + Send + Sync,
{
    if parallel {
        items.par_iter().flat_map_iter(|item| generate(item)).collect()
    } else {
        items.iter().flat_map(|item| generate(item)).collect()
    }
}

/// Unordered pairs of distinct routes that both satisfy `keep`.
pub fn route_pairs<F>(solution: &Solution, keep: F) -> Vec<(usize, usize)>
where
    F: Fn(&Route) -> bool,
{
    (0..solution.route_count())
        .filter(|&idx| keep(solution.route(idx)))
        .tuple_combinations()
        .collect()
}

/// Replace visits `start..=end` of `stops` with `replacement`.
pub fn splice_stops(stops: &[Stop], start: usize, end: usize, replacement: &[Stop]) -> Vec<Stop> {
    let mut result = Vec::with_capacity(stops.len() - (end + 1 - start) + replacement.len());
    result.extend_from_slice(&stops[..start]);
    result.extend_from_slice(replacement);
    result.extend_from_slice(&stops[end + 1..]);
    result
}

/// Reconstruct two modified routes; both must be feasible.
pub fn reconstruct_pair(problem: &Problem, stops_a: &[Stop], stops_b: &[Stop]) -> Option<(Route, Route)> {
    let capacity = problem.vehicle_capacity;
    let route_a = reconstruct(problem, stops_a, capacity).into_route()?;
    let route_b = reconstruct(problem, stops_b, capacity).into_route()?;
    Some((route_a, route_b))
}
