//! Best-insertion machinery shared by construction and diversification.

use crate::config::InsertionParams;
use crate::feasibility::{reconstruct, service_start, Reconstruction};
use crate::problem::Problem;
use crate::solution::{Route, Stop};

/// A feasible placement of an unrouted customer.
#[derive(Debug, Clone)]
pub struct Insertion {
    /// Index of the route the customer goes into
    pub route: usize,
    /// Position the customer takes in the route's visit list
    pub position: usize,
    pub customer: usize,
    /// Insertion criterion, higher is better
    pub value: f64,
    /// The route with the customer inserted
    pub result: Route,
}

/// Score of inserting `candidate` between the visits at `position - 1` and
/// `position` of `route`.
///
/// `λ·d(depot,u) − (α1·c11 + α2·c12)` where c11 is the detour and c12 the
/// shift imposed on the service start of the next stop.
pub fn insertion_value(
    problem: &Problem,
    route: &Route,
    position: usize,
    candidate: usize,
    params: &InsertionParams,
) -> f64 {
    let previous = route.visits[position - 1];
    let next = route.visits[position];
    let u = Stop::Customer(candidate);

    let c11 = problem.distance(previous.stop, u) + problem.distance(u, next.stop)
        - params.mu * problem.distance(previous.stop, next.stop);

    let candidate_start = service_start(problem, previous.stop, previous.service_start, u);
    let c12 = service_start(problem, u, candidate_start, next.stop) - next.service_start;

    params.lambda * problem.distance(Stop::Depot, u) - (params.alpha1 * c11 + params.alpha2 * c12)
}

/// Rebuild `route` with `candidate` inserted at `position`.
pub fn insert_at(problem: &Problem, route: &Route, position: usize, candidate: usize) -> Reconstruction {
    let mut stops = route.stops();
    stops.insert(position, Stop::Customer(candidate));
    reconstruct(problem, &stops, problem.vehicle_capacity)
}

/// Every feasible placement of every candidate into any of the given
/// `(index, route)` pairs, scored.
pub fn feasible_insertions<'r, I>(
    problem: &Problem,
    routes: I,
    candidates: &[usize],
    params: &InsertionParams,
) -> Vec<Insertion>
where
    I: IntoIterator<Item = (usize, &'r Route)>,
{
    let mut insertions = Vec::new();

    for (route_idx, route) in routes {
        for position in 1..route.len() {
            for &candidate in candidates {
                if let Reconstruction::Feasible(result) = insert_at(problem, route, position, candidate) {
                    insertions.push(Insertion {
                        route: route_idx,
                        position,
                        customer: candidate,
                        value: insertion_value(problem, route, position, candidate, params),
                        result,
                    });
                }
            }
        }
    }

    insertions
}

/// The highest-scoring feasible placement. Ties keep the first one found.
pub fn best_insertion<'r, I>(
    problem: &Problem,
    routes: I,
    candidates: &[usize],
    params: &InsertionParams,
) -> Option<Insertion>
where
    I: IntoIterator<Item = (usize, &'r Route)>,
{
    feasible_insertions(problem, routes, candidates, params)
        .into_iter()
        .fold(None, |best: Option<Insertion>, insertion| match best {
            Some(b) if b.value >= insertion.value => Some(b),
            _ => Some(insertion),
        })
}
