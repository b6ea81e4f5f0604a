//! Configuration parameters for the VRPTW search.

use crate::error::{Result, VrptwError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Weights of the insertion criterion
/// `λ·d(depot,u) − (α1·c11 + α2·c12)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsertionParams {
    /// Weight of the detour cost c11
    pub alpha1: f64,
    /// Weight of the pushback c12
    pub alpha2: f64,
    /// Weight of the removed edge inside c11
    pub mu: f64,
    /// Weight of the distance from the depot
    pub lambda: f64,
}

impl Default for InsertionParams {
    fn default() -> Self {
        InsertionParams {
            alpha1: 0.5,
            alpha2: 0.5,
            mu: 1.0,
            lambda: 2.0,
        }
    }
}

/// How the controller decides whether to move to a candidate neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Move to the cheapest neighbor not found in a FIFO memory of recent solutions.
    Tabu { tabu_list_size: usize },
    /// Move to the cheapest neighbor, accepting it when worse with probability `exp(-Δ/T)`.
    SimulatedAnnealing {
        initial_temperature: f64,
        cooling_rate: f64,
    },
    /// Move to the cheapest neighbor only if it is strictly cheaper.
    Descent,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        AcceptancePolicy::Tabu { tabu_list_size: 10 }
    }
}

/// Parameters of the remove-and-reinsert perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversificationParams {
    pub min_remove: usize,
    pub max_remove: usize,
    /// Non-improving iterations tolerated before diversifying, `0` never diversifies
    pub non_improving_threshold: u32,
}

impl Default for DiversificationParams {
    fn default() -> Self {
        DiversificationParams {
            min_remove: 2,
            max_remove: 8,
            non_improving_threshold: 20,
        }
    }
}

/// Configuration settings for the VRPTW search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Insertion criterion weights
    pub insertion: InsertionParams,
    /// Number of search iterations after construction
    pub iteration_count: u32,
    pub acceptance: AcceptancePolicy,
    pub diversification: DiversificationParams,
    /// Run a hill-climbing descent on the constructed solution before searching
    pub descend_initial: bool,
    /// Enumerate neighborhoods on the rayon thread pool
    pub parallel: bool,
    /// Seed of the random generator used for diversification and annealing
    pub seed: u64,
    /// Optional time limit for the algorithm
    pub time_limit: Option<Duration>,
    /// Keep an [`IterationRecord`](crate::IterationRecord) for every iteration
    pub record_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            insertion: InsertionParams::default(),
            iteration_count: 500,
            acceptance: AcceptancePolicy::default(),
            diversification: DiversificationParams::default(),
            descend_initial: true,
            parallel: true,
            seed: 42,
            time_limit: None,
            record_history: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the insertion weights.
    pub fn with_insertion(mut self, insertion: InsertionParams) -> Self {
        self.insertion = insertion;
        self
    }

    /// Set the iteration budget.
    pub fn with_iteration_count(mut self, iterations: u32) -> Self {
        self.iteration_count = iterations;
        self
    }

    /// Set the acceptance policy.
    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Set the diversification parameters.
    pub fn with_diversification(mut self, diversification: DiversificationParams) -> Self {
        self.diversification = diversification;
        self
    }

    /// Enable or disable the descent on the constructed solution.
    pub fn with_descend_initial(mut self, descend: bool) -> Self {
        self.descend_initial = descend;
        self
    }

    /// Enable or disable parallel neighborhood enumeration.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the time limit from a number of seconds.
    pub fn with_time_limit_secs(self, seconds: f64) -> Result<Self> {
        let duration = Duration::try_from_secs_f64(seconds)
            .map_err(|e| VrptwError::InvalidConfig(format!("invalid time limit {}: {}", seconds, e)))?;
        Ok(self.with_time_limit(duration))
    }

    /// Enable or disable the per-iteration history.
    pub fn with_record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Reject tunables the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(VrptwError::InvalidConfig(msg.to_string()));

        let weights = [
            self.insertion.alpha1,
            self.insertion.alpha2,
            self.insertion.mu,
            self.insertion.lambda,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return invalid("insertion weights must be finite");
        }

        match self.acceptance {
            AcceptancePolicy::Tabu { tabu_list_size } if tabu_list_size == 0 => {
                return invalid("tabu list size must be at least 1");
            }
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
            } => {
                if !initial_temperature.is_finite() || initial_temperature < 0.0 {
                    return invalid("initial temperature must be non-negative");
                }
                if !(cooling_rate > 0.0 && cooling_rate <= 1.0) {
                    return invalid("cooling rate must lie in (0, 1]");
                }
            }
            _ => {}
        }

        if self.diversification.min_remove > self.diversification.max_remove {
            return invalid("min_remove must not exceed max_remove");
        }

        Ok(())
    }
}
