//! Neighborhood operators and the hill-climbing descent built on them.
//!
//! Every operator enumerates the complete feasible neighborhood of a
//! solution without touching it. Candidates carry only the routes they
//! replace; a full [`Solution`] is produced when one is selected.

pub mod cross;
pub mod exchange;
pub mod relocate;
pub mod two_opt;
pub mod utils;

use crate::problem::Problem;
use crate::solution::{Route, Signature, Solution};
use log::{debug, trace};
use serde::Serialize;

pub use self::cross::Cross;
pub use self::exchange::Exchange;
pub use self::relocate::Relocate;
pub use self::two_opt::TwoOpt;

/// Minimum distance decrease counted as an improvement.
pub const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// The move that produced a neighbor. Positions index route visits, so `1`
/// is the first customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Move {
    /// Reverse visits `i..=j` of a route
    TwoOpt { route: usize, i: usize, j: usize },
    /// Swap one customer of each route
    Exchange {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    /// Move the customer at `from_pos` so it is served before the visit at `to_pos`
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Swap visits `start_a..=end_a` of one route with `start_b..=end_b` of another
    Cross {
        route_a: usize,
        start_a: usize,
        end_a: usize,
        route_b: usize,
        start_b: usize,
        end_b: usize,
    },
}

/// A feasible neighbor of some solution.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub operation: Move,
    /// Replacement routes, by route index
    pub routes: Vec<(usize, Route)>,
    /// Change of the combined distance of the replaced routes
    pub delta: f64,
    /// Total cost of the neighbor solution
    pub cost: f64,
}

impl Neighbor {
    pub(crate) fn new(solution: &Solution, operation: Move, routes: Vec<(usize, Route)>) -> Self {
        let delta: f64 = routes
            .iter()
            .map(|(idx, route)| route.distance() - solution.route(*idx).distance())
            .sum();

        Neighbor {
            operation,
            routes,
            delta,
            cost: solution.cost() + delta,
        }
    }

    /// Whether the affected routes got strictly shorter.
    pub fn is_improving(&self) -> bool {
        self.delta < -IMPROVEMENT_EPSILON
    }

    /// Build the neighbor solution from the solution it was generated from.
    pub fn apply(self, solution: &Solution) -> Solution {
        let mut routes = solution.routes().to_vec();
        for (idx, route) in self.routes {
            routes[idx] = route;
        }
        Solution::new(routes)
    }

    /// Signature of the neighbor solution, without building it.
    pub fn signature(&self, solution: &Solution) -> Signature {
        Signature::from_routes(solution.routes().iter().enumerate().map(|(idx, route)| {
            self.routes
                .iter()
                .find(|(replaced, _)| *replaced == idx)
                .map_or(route, |(_, new_route)| new_route)
        }))
    }
}

/// A move generator.
pub trait NeighborhoodOperator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Enumerate every feasible neighbor reachable with one move. Nothing is
    /// filtered on cost.
    fn neighbors(&self, problem: &Problem, solution: &Solution, parallel: bool) -> Vec<Neighbor>;
}

/// Runs the four operators, either to collect a neighborhood or to descend
/// to a local optimum.
pub struct LocalSearch {
    operators: Vec<Box<dyn NeighborhoodOperator>>,
    parallel: bool,
}

impl LocalSearch {
    /// Create a local search over segment reversal, exchange, relocate and cross.
    pub fn new(parallel: bool) -> Self {
        LocalSearch::with_operators(
            vec![
                Box::new(TwoOpt),
                Box::new(Exchange),
                Box::new(Relocate),
                Box::new(Cross),
            ],
            parallel,
        )
    }

    pub fn with_operators(operators: Vec<Box<dyn NeighborhoodOperator>>, parallel: bool) -> Self {
        LocalSearch {
            operators,
            parallel,
        }
    }

    pub fn operators(&self) -> &[Box<dyn NeighborhoodOperator>] {
        &self.operators
    }

    /// The union of all operators' neighborhoods.
    pub fn neighborhood(&self, problem: &Problem, solution: &Solution) -> Vec<Neighbor> {
        let mut pool = Vec::new();
        for operator in &self.operators {
            let neighbors = operator.neighbors(problem, solution, self.parallel);
            trace!("{} generated {} neighbors", operator.name(), neighbors.len());
            pool.extend(neighbors);
        }
        pool
    }

    /// Apply each operator's best improving move until none improves.
    pub fn descend(&self, problem: &Problem, mut solution: Solution) -> Solution {
        let initial_cost = solution.cost();
        let mut moves = 0usize;
        let mut improved = true;

        while improved {
            improved = false;

            for operator in &self.operators {
                while let Some(best) = best_improving(operator.neighbors(problem, &solution, self.parallel)) {
                    trace!("{}: {:?} saves {:.3}", operator.name(), best.operation, -best.delta);
                    solution = best.apply(&solution);
                    moves += 1;
                    improved = true;
                }
            }
        }

        debug!(
            "Descent applied {} moves, cost {:.2} -> {:.2}",
            moves,
            initial_cost,
            solution.cost()
        );
        solution
    }
}

/// The improving neighbor with the largest saving, first one on ties.
fn best_improving(neighbors: Vec<Neighbor>) -> Option<Neighbor> {
    neighbors
        .into_iter()
        .filter(Neighbor::is_improving)
        .fold(None, |best: Option<Neighbor>, n| match best {
            Some(b) if b.delta <= n.delta => Some(b),
            _ => Some(n),
        })
}
