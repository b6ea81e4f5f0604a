//! Solution representation for the VRPTW.

use crate::feasibility::service_start;
use crate::problem::{Problem, DEPOT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a route.
///
/// Both route endpoints are the depot, but they are kept apart by their
/// variant rather than by a made-up customer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stop {
    /// Departure from the depot
    Depot,
    /// A customer, by index into [`Problem::nodes`]
    Customer(usize),
    /// Return to the depot
    Return,
}

impl Stop {
    /// Index of the node this stop refers to.
    #[inline]
    pub fn node_index(self) -> usize {
        match self {
            Stop::Depot | Stop::Return => DEPOT,
            Stop::Customer(idx) => idx,
        }
    }

    /// The customer index, if this is not a depot endpoint.
    #[inline]
    pub fn customer(self) -> Option<usize> {
        match self {
            Stop::Customer(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn is_depot(self) -> bool {
        !matches!(self, Stop::Customer(_))
    }
}

/// A stop together with the time service starts there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub stop: Stop,
    pub service_start: f64,
}

/// A vehicle route `Depot -> customers... -> Return`.
///
/// Routes are only built through
/// [`reconstruct`](crate::feasibility::reconstruct) (or [`Route::empty`]), so
/// a `Route` value always satisfies the capacity and time-window constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub(crate) visits: Vec<Visit>,
    pub(crate) load: f64,
    pub(crate) distance: f64,
}

impl Route {
    /// Create a route that leaves the depot and comes straight back.
    pub fn empty(problem: &Problem) -> Self {
        let departure = problem.depot().window_start;
        Route {
            visits: vec![
                Visit {
                    stop: Stop::Depot,
                    service_start: departure,
                },
                Visit {
                    stop: Stop::Return,
                    service_start: service_start(problem, Stop::Depot, departure, Stop::Return),
                },
            ],
            load: 0.0,
            distance: 0.0,
        }
    }

    /// All visits, depot endpoints included.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// The stop sequence, depot endpoints included.
    pub fn stops(&self) -> Vec<Stop> {
        self.visits.iter().map(|v| v.stop).collect()
    }

    /// Customer indices in visiting order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        self.visits.iter().filter_map(|v| v.stop.customer())
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Number of visits, depot endpoints included.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Number of customers served.
    pub fn customer_count(&self) -> usize {
        self.visits.len().saturating_sub(2)
    }

    /// Check if the route serves no customer.
    pub fn is_empty(&self) -> bool {
        self.customer_count() == 0
    }

    /// Position of a customer in the route, if it is served here.
    pub fn position_of(&self, customer: usize) -> Option<usize> {
        self.visits
            .iter()
            .position(|v| v.stop == Stop::Customer(customer))
    }

    /// Customer ids in visiting order.
    pub fn customer_ids(&self, problem: &Problem) -> Vec<usize> {
        self.customers().map(|c| problem.nodes[c].id).collect()
    }
}

/// Canonical form of a solution used by the tabu memory: the customer
/// sequences of all non-empty routes, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Vec<Vec<usize>>);

impl Signature {
    pub fn from_routes<'a, I>(routes: I) -> Self
    where
        I: IntoIterator<Item = &'a Route>,
    {
        let mut sequences: Vec<Vec<usize>> = routes
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.customers().collect())
            .collect();
        sequences.sort_unstable();
        Signature(sequences)
    }
}

/// A complete VRPTW solution: one route per vehicle.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    /// Total distance over all routes
    cost: f64,
}

impl Solution {
    /// Create a solution from routes, computing its cost.
    pub fn new(routes: Vec<Route>) -> Self {
        let cost = routes.iter().map(|r| r.distance).sum();
        Solution { routes, cost }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, idx: usize) -> &Route {
        &self.routes[idx]
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Get the number of routes, used or not.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes serving at least one customer.
    pub fn used_route_count(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Total load carried by all vehicles.
    pub fn total_load(&self) -> f64 {
        self.routes.iter().map(|r| r.load).sum()
    }

    /// Number of customers served over all routes.
    pub fn routed_customer_count(&self) -> usize {
        self.routes.iter().map(|r| r.customer_count()).sum()
    }

    /// Find which route contains a specific customer.
    pub fn find_route_for_customer(&self, customer: usize) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.position_of(customer).is_some())
    }

    pub fn signature(&self) -> Signature {
        Signature::from_routes(&self.routes)
    }

    /// Check that every customer of the problem is served exactly once.
    pub fn is_complete(&self, problem: &Problem) -> bool {
        let mut served = vec![0usize; problem.nodes.len()];
        for customer in self.routes.iter().flat_map(|r| r.customers()) {
            served[customer] += 1;
        }
        problem.customer_indices().all(|c| served[c] == 1)
    }

    /// Build the serializable report handed to output writers.
    pub fn report(&self, problem: &Problem) -> SolutionReport {
        let routes = self
            .routes
            .iter()
            .enumerate()
            .map(|(vehicle, route)| RouteReport {
                vehicle,
                load: route.load,
                distance: route.distance,
                stops: route
                    .visits
                    .iter()
                    .map(|visit| StopReport {
                        id: problem.node(visit.stop).id,
                        kind: match visit.stop {
                            Stop::Depot => StopKind::Depot,
                            Stop::Customer(_) => StopKind::Customer,
                            Stop::Return => StopKind::Return,
                        },
                        service_start: visit.service_start,
                    })
                    .collect(),
            })
            .collect();

        SolutionReport {
            name: problem.name.clone(),
            cost: self.cost,
            routes,
        }
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Routes: {}", self.routes.len())?;

        for (i, route) in self.routes.iter().enumerate() {
            let customers: Vec<usize> = route.customers().collect();
            writeln!(
                f,
                "  Route {}: {:?} (Load: {:.2}, Distance: {:.2})",
                i, customers, route.load, route.distance
            )?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Depot,
    Customer,
    Return,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopReport {
    pub id: usize,
    pub kind: StopKind,
    pub service_start: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteReport {
    pub vehicle: usize,
    pub load: f64,
    pub distance: f64,
    pub stops: Vec<StopReport>,
}

/// Output record of a solved instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionReport {
    pub name: String,
    pub cost: f64,
    pub routes: Vec<RouteReport>,
}
