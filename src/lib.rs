//! # VRPTW heuristics
//!
//! Construction and local search for the Vehicle Routing Problem with Time
//! Windows.
//!
//! An initial solution is built with a sequential insertion heuristic
//! (farthest seed, best-scoring feasible insertion). It is then improved by an
//! iterated search over four neighborhoods (segment reversal, exchange,
//! relocate and cross) under a tabu, simulated annealing or descent
//! acceptance rule, with a remove-and-reinsert perturbation whenever the
//! search stagnates.

pub mod acceptance;
pub mod config;
pub mod construction;
pub mod diversifier;
pub mod error;
pub mod feasibility;
pub mod insertion;
pub mod local_search;
pub mod problem;
pub mod solution;
pub mod utils;

use crate::acceptance::Acceptor;
use crate::config::Config;
use crate::construction::InsertionHeuristic;
use crate::diversifier::Diversifier;
use crate::local_search::{LocalSearch, Move};
use crate::problem::Problem;
use crate::solution::{Signature, Solution};
use crate::utils::SearchStatistics;

pub use crate::error::{Result, VrptwError};

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Where the search controller currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    Constructing,
    Searching,
    Diversifying,
    Terminated,
}

/// What happened during one search iteration.
#[derive(Debug, Clone)]
pub struct IterationRecord {
    pub iteration: u32,
    /// Size of the feasible neighborhood of the current solution
    pub candidates: usize,
    /// The move taken, if a candidate was accepted
    pub accepted: Option<Move>,
    /// Signature of the accepted candidate
    pub accepted_signature: Option<Signature>,
    pub current_cost: f64,
    pub best_cost: f64,
    /// Whether the iteration ended with a diversification
    pub diversified: bool,
}

/// The search controller: construction, then iterated neighborhood search.
pub struct VrptwSolver {
    pub problem: Problem,
    pub config: Config,
    pub phase: SearchPhase,
    pub best_solution: Option<Solution>,
    pub run_time: Duration,
    pub iterations: u32,
    /// Non-improving iterations since the last diversification
    pub iterations_without_improvement: u32,
    pub diversifications: u32,
    pub accepted_moves: u32,
    /// Filled only when [`Config::record_history`] is set
    pub history: Vec<IterationRecord>,
    local_search: LocalSearch,
    diversifier: Diversifier,
    acceptor: Acceptor,
    rng: ChaCha8Rng,
    start_time: Instant,
}

impl VrptwSolver {
    /// Create a solver for the given problem and configuration.
    ///
    /// Both are validated here, before any construction happens.
    pub fn new(problem: Problem, config: Config) -> Result<Self> {
        problem.validate()?;
        config.validate()?;

        Ok(VrptwSolver {
            local_search: LocalSearch::new(config.parallel),
            diversifier: Diversifier::new(&config.diversification, config.insertion),
            acceptor: Acceptor::from_policy(&config.acceptance),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            problem,
            config,
            phase: SearchPhase::Constructing,
            best_solution: None,
            run_time: Duration::from_secs(0),
            iterations: 0,
            iterations_without_improvement: 0,
            diversifications: 0,
            accepted_moves: 0,
            history: Vec::new(),
            start_time: Instant::now(),
        })
    }

    /// Build the initial solution, optionally polished by a descent.
    pub fn initialize(&mut self) -> Result<Solution> {
        self.phase = SearchPhase::Constructing;

        let mut solution = InsertionHeuristic::new(&self.problem, self.config.insertion).construct()?;
        if self.config.descend_initial {
            solution = self.local_search.descend(&self.problem, solution);
        }

        self.acceptor.remember(&solution);
        self.best_solution = Some(solution.clone());
        Ok(solution)
    }

    /// Run the algorithm until the termination criteria are met.
    ///
    /// Every call starts over from construction with fresh counters, an
    /// empty tabu memory, the initial temperature and the configured seed.
    pub fn run(&mut self) -> Result<&Solution> {
        self.reset();
        self.start_time = Instant::now();

        let mut current = self.initialize()?;
        let mut best = current.clone();
        info!("Starting search from cost {:.2}", best.cost());

        self.phase = SearchPhase::Searching;
        while !self.should_terminate() {
            self.iterate(&mut current, &mut best);
        }

        self.phase = SearchPhase::Terminated;
        self.run_time = self.start_time.elapsed();
        info!(
            "Search finished after {} iterations in {}: best cost {:.2} using {} vehicles",
            self.iterations,
            utils::format_duration(self.run_time),
            best.cost(),
            best.used_route_count()
        );

        Ok(&*self.best_solution.insert(best))
    }

    fn reset(&mut self) {
        self.iterations = 0;
        self.iterations_without_improvement = 0;
        self.diversifications = 0;
        self.accepted_moves = 0;
        self.history.clear();
        self.acceptor = Acceptor::from_policy(&self.config.acceptance);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
    }

    /// One controller step: rank the neighborhood, accept or reject, track
    /// the best solution and diversify on stagnation.
    fn iterate(&mut self, current: &mut Solution, best: &mut Solution) {
        let pool = self.local_search.neighborhood(&self.problem, current);
        let candidates = pool.len();

        let mut improving = false;
        let mut accepted = None;
        let mut accepted_signature = None;

        if let Some(neighbor) = self.acceptor.select(current, pool, &mut self.rng) {
            improving = neighbor.is_improving();
            accepted = Some(neighbor.operation);
            *current = neighbor.apply(current);
            if self.config.record_history {
                accepted_signature = Some(current.signature());
            }
            self.accepted_moves += 1;

            if current.cost() < best.cost() {
                *best = current.clone();
                debug!("Iteration {}: new best cost {:.3}", self.iterations, best.cost());
            }
        }

        if !improving {
            self.iterations_without_improvement += 1;
        }

        let threshold = self.config.diversification.non_improving_threshold;
        let diversified = threshold > 0 && self.iterations_without_improvement >= threshold;
        if diversified {
            self.diversify(current, best);
        }

        self.acceptor.cool();

        debug!(
            "Iteration {}: {} candidates, current {:.3}, best {:.3}",
            self.iterations,
            candidates,
            current.cost(),
            best.cost()
        );
        if self.config.record_history {
            self.history.push(IterationRecord {
                iteration: self.iterations,
                candidates,
                accepted,
                accepted_signature,
                current_cost: current.cost(),
                best_cost: best.cost(),
                diversified,
            });
        }
        self.iterations += 1;
    }

    /// Restart from a perturbed copy of the best solution.
    fn diversify(&mut self, current: &mut Solution, best: &mut Solution) {
        self.phase = SearchPhase::Diversifying;

        *current = self.diversifier.diversify(&self.problem, best, &mut self.rng);
        if current.cost() < best.cost() {
            *best = current.clone();
        }
        self.iterations_without_improvement = 0;
        self.diversifications += 1;
        debug!(
            "Diversification {} restarts from cost {:.3}",
            self.diversifications,
            current.cost()
        );

        self.phase = SearchPhase::Searching;
    }

    /// Check if the termination criteria are met.
    fn should_terminate(&self) -> bool {
        if self.iterations >= self.config.iteration_count {
            return true;
        }

        if let Some(time_limit) = self.config.time_limit {
            if self.start_time.elapsed() >= time_limit {
                return true;
            }
        }

        false
    }

    /// Summary of the last run.
    pub fn statistics(&self) -> SearchStatistics {
        let best = self.best_solution.as_ref();
        SearchStatistics {
            iterations: self.iterations,
            runtime: self.run_time,
            accepted_moves: self.accepted_moves,
            diversifications: self.diversifications,
            best_solution_cost: best.map_or(f64::INFINITY, |s| s.cost()),
            best_solution_routes: best.map_or(0, |s| s.used_route_count()),
            final_temperature: self.acceptor.temperature(),
        }
    }
}

/// Solve an instance with the given configuration and return the best solution.
pub fn solve(problem: Problem, config: Config) -> Result<Solution> {
    let mut solver = VrptwSolver::new(problem, config)?;
    solver.run().cloned()
}
