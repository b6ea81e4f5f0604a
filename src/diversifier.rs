//! Remove-and-reinsert perturbation used to escape local optima.

use crate::config::{DiversificationParams, InsertionParams};
use crate::feasibility::{reconstruct, Reconstruction};
use crate::insertion::best_insertion;
use crate::problem::Problem;
use crate::solution::{Route, Solution, Stop};
use log::{debug, warn};
use rand::seq::index;
use rand::Rng;

/// Removes a random set of routed customers and greedily reinserts them.
pub struct Diversifier {
    min_remove: usize,
    max_remove: usize,
    insertion: InsertionParams,
}

impl Diversifier {
    pub fn new(params: &DiversificationParams, insertion: InsertionParams) -> Self {
        Diversifier {
            min_remove: params.min_remove,
            max_remove: params.max_remove.max(params.min_remove),
            insertion,
        }
    }

    /// Number of customers to remove: uniform in `[min, max]`, capped by the
    /// number of customers actually routed.
    pub fn removal_count<R: Rng + ?Sized>(&self, routed: usize, rng: &mut R) -> usize {
        rng.gen_range(self.min_remove..=self.max_remove).min(routed)
    }

    /// Perturb `solution` into a new, still feasible, solution.
    ///
    /// When the removed customers cannot all be put back, the input is
    /// returned unchanged.
    pub fn diversify<R: Rng + ?Sized>(&self, problem: &Problem, solution: &Solution, rng: &mut R) -> Solution {
        let routed: Vec<usize> = solution.routes().iter().flat_map(|r| r.customers()).collect();
        let count = self.removal_count(routed.len(), rng);

        let mut routes = solution.routes().to_vec();
        let mut removed = Vec::with_capacity(count);

        for pick in index::sample(rng, routed.len(), count) {
            let customer = routed[pick];
            if remove_customer(problem, &mut routes, customer) {
                removed.push(customer);
            }
        }
        debug!("Diversifier removed {} customers: {:?}", removed.len(), removed);

        match self.reinsert(problem, routes, removed) {
            Some(routes) => Solution::new(routes),
            None => {
                warn!("Diversification could not reinsert every customer, keeping the solution");
                solution.clone()
            }
        }
    }

    /// Put every customer back with the best insertion over the used routes,
    /// falling back to an idle vehicle.
    fn reinsert(&self, problem: &Problem, mut routes: Vec<Route>, mut pending: Vec<usize>) -> Option<Vec<Route>> {
        while !pending.is_empty() {
            let used = routes.iter().enumerate().filter(|(_, r)| !r.is_empty());
            let insertion = best_insertion(problem, used, &pending, &self.insertion).or_else(|| {
                let idle = routes.iter().enumerate().find(|(_, r)| r.is_empty());
                best_insertion(problem, idle, &pending, &self.insertion)
            })?;

            pending.retain(|&c| c != insertion.customer);
            routes[insertion.route] = insertion.result;
        }

        Some(routes)
    }
}

/// Drop `customer` from whichever route serves it. Returns `false` when the
/// shortened route would not be feasible.
fn remove_customer(problem: &Problem, routes: &mut [Route], customer: usize) -> bool {
    let Some((r_idx, pos)) = routes
        .iter()
        .enumerate()
        .find_map(|(idx, r)| r.position_of(customer).map(|pos| (idx, pos)))
    else {
        return false;
    };

    let mut stops: Vec<Stop> = routes[r_idx].stops();
    stops.remove(pos);

    match reconstruct(problem, &stops, problem.vehicle_capacity) {
        Reconstruction::Feasible(route) => {
            routes[r_idx] = route;
            true
        }
        Reconstruction::Infeasible { .. } => false,
    }
}
