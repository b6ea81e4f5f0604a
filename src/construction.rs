//! Sequential insertion heuristic building the initial solution.
//!
//! Routes are opened one at a time. Each starts from the unrouted customer
//! farthest from the depot and grows by repeatedly inserting the
//! best-scoring feasible (customer, position) pair until nothing fits.

use crate::config::InsertionParams;
use crate::error::{Result, VrptwError};
use crate::feasibility::{reconstruct, Reconstruction};
use crate::insertion::best_insertion;
use crate::problem::Problem;
use crate::solution::{Route, Solution, Stop};
use log::{debug, info};

/// Builds a complete solution from scratch.
pub struct InsertionHeuristic<'a> {
    problem: &'a Problem,
    params: InsertionParams,
}

impl<'a> InsertionHeuristic<'a> {
    pub fn new(problem: &'a Problem, params: InsertionParams) -> Self {
        InsertionHeuristic { problem, params }
    }

    /// Route every customer, one vehicle after the other.
    ///
    /// Vehicles left over get empty routes. Fails with
    /// [`VrptwError::Unroutable`] if customers remain once the fleet is used
    /// up, or if some customer cannot be served even on its own.
    pub fn construct(&self) -> Result<Solution> {
        let problem = self.problem;
        let mut unrouted: Vec<usize> = problem.customer_indices().collect();
        let mut routes = Vec::with_capacity(problem.fleet_size);

        while !unrouted.is_empty() && routes.len() < problem.fleet_size {
            match self.build_route(&mut unrouted) {
                Some(route) => {
                    debug!(
                        "Route {} closed with {} customers (load {:.2}, distance {:.2})",
                        routes.len(),
                        route.customer_count(),
                        route.load(),
                        route.distance()
                    );
                    routes.push(route);
                }
                None => break,
            }
        }

        if !unrouted.is_empty() {
            let customers: Vec<usize> = unrouted.iter().map(|&c| problem.nodes[c].id).collect();
            return Err(VrptwError::Unroutable { customers });
        }

        let used = routes.len();
        routes.resize_with(problem.fleet_size, || Route::empty(problem));

        let solution = Solution::new(routes);
        info!(
            "Initial solution uses {} of {} vehicles, cost {:.2}",
            used,
            problem.fleet_size,
            solution.cost()
        );
        Ok(solution)
    }

    /// Open a route from a seed and grow it until no candidate fits.
    /// Inserted customers are removed from `unrouted`.
    ///
    /// Returns `None` when no remaining customer can be served on its own.
    pub fn build_route(&self, unrouted: &mut Vec<usize>) -> Option<Route> {
        let (seed_idx, mut route) = seed_route(self.problem, unrouted)?;
        unrouted.remove(seed_idx);

        while let Some(insertion) =
            best_insertion(self.problem, [(0, &route)], unrouted, &self.params)
        {
            unrouted.retain(|&c| c != insertion.customer);
            route = insertion.result;
        }

        Some(route)
    }
}

/// Pick the farthest customer from the depot that can be served alone and
/// build its single-customer route. Returns its index in `unrouted`.
pub fn seed_route(problem: &Problem, unrouted: &[usize]) -> Option<(usize, Route)> {
    let mut order: Vec<usize> = (0..unrouted.len()).collect();
    // Stable sort keeps the first of equally distant customers in front.
    order.sort_by(|&a, &b| {
        let da = problem.distance(Stop::Depot, Stop::Customer(unrouted[a]));
        let db = problem.distance(Stop::Depot, Stop::Customer(unrouted[b]));
        db.total_cmp(&da)
    });

    order.into_iter().find_map(|idx| {
        let stops = [Stop::Depot, Stop::Customer(unrouted[idx]), Stop::Return];
        match reconstruct(problem, &stops, problem.vehicle_capacity) {
            Reconstruction::Feasible(route) => Some((idx, route)),
            Reconstruction::Infeasible { .. } => None,
        }
    })
}
