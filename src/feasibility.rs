//! Feasibility oracle: time-window propagation, capacity accounting and
//! route reconstruction.
//!
//! [`reconstruct`] is the only place where feasibility is decided. Every
//! operator builds a candidate stop sequence and asks it for a verdict.

use crate::problem::Problem;
use crate::solution::{Route, Stop, Visit};

/// Euclidean distance between two stops.
#[inline]
pub fn distance(problem: &Problem, a: Stop, b: Stop) -> f64 {
    problem.distance(a, b)
}

/// Earliest service start at `next` when service at `previous` started at
/// `previous_start`.
#[inline]
pub fn service_start(problem: &Problem, previous: Stop, previous_start: f64, next: Stop) -> f64 {
    let prev_node = problem.node(previous);
    let next_node = problem.node(next);
    let arrival = previous_start + prev_node.service_duration + problem.distance(previous, next);
    next_node.window_start.max(arrival)
}

/// The first constraint a stop sequence breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    Capacity { load: f64, capacity: f64 },
    TimeWindow { service_start: f64, window_end: f64 },
}

/// Outcome of replaying a stop sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconstruction {
    Feasible(Route),
    /// Replay stopped at `position`, the first stop that breaks a constraint.
    Infeasible {
        position: usize,
        violation: Violation,
    },
}

impl Reconstruction {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Reconstruction::Feasible(_))
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            Reconstruction::Feasible(route) => Some(route),
            Reconstruction::Infeasible { .. } => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            Reconstruction::Feasible(route) => Some(route),
            Reconstruction::Infeasible { .. } => None,
        }
    }
}

/// Rebuild a route from scratch, recomputing load, distance and the chained
/// service starts from position 1 onwards.
///
/// `stops` must start with [`Stop::Depot`] and end with [`Stop::Return`].
/// Service at the depot starts at the opening of its window.
pub fn reconstruct(problem: &Problem, stops: &[Stop], capacity: f64) -> Reconstruction {
    debug_assert!(stops.len() >= 2);
    debug_assert_eq!(stops.first(), Some(&Stop::Depot));
    debug_assert_eq!(stops.last(), Some(&Stop::Return));

    let mut visits = Vec::with_capacity(stops.len());
    let mut load = 0.0;
    let mut total_distance = 0.0;

    let mut previous = stops[0];
    let mut previous_start = problem.node(previous).window_start;
    visits.push(Visit {
        stop: previous,
        service_start: previous_start,
    });

    for (position, &stop) in stops.iter().enumerate().skip(1) {
        let node = problem.node(stop);
        let start = service_start(problem, previous, previous_start, stop);

        load += node.demand;
        total_distance += problem.distance(previous, stop);

        if load > capacity {
            return Reconstruction::Infeasible {
                position,
                violation: Violation::Capacity { load, capacity },
            };
        }
        if start > node.window_end {
            return Reconstruction::Infeasible {
                position,
                violation: Violation::TimeWindow {
                    service_start: start,
                    window_end: node.window_end,
                },
            };
        }

        visits.push(Visit {
            stop,
            service_start: start,
        });
        previous = stop;
        previous_start = start;
    }

    Reconstruction::Feasible(Route {
        visits,
        load,
        distance: total_distance,
    })
}
