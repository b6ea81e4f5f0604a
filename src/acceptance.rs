//! Candidate selection and acceptance rules of the search controller.

use crate::config::AcceptancePolicy;
use crate::local_search::Neighbor;
use crate::solution::{Signature, Solution};
use log::trace;
use rand::Rng;
use std::collections::VecDeque;

/// Fixed-capacity FIFO memory of recently visited solutions.
#[derive(Debug, Clone)]
pub struct TabuList {
    capacity: usize,
    entries: VecDeque<Signature>,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        TabuList {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.entries.contains(signature)
    }

    /// Remember a signature, forgetting the oldest one when full.
    pub fn push(&mut self, signature: Signature) {
        self.entries.push_back(signature);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The lowest-cost candidate, the earliest one on ties.
fn cheapest(candidates: Vec<Neighbor>) -> Option<Neighbor> {
    candidates.into_iter().fold(None, |best: Option<Neighbor>, n| match best {
        Some(b) if b.cost <= n.cost => Some(b),
        _ => Some(n),
    })
}

/// Runtime state of an [`AcceptancePolicy`].
#[derive(Debug, Clone)]
pub enum Acceptor {
    Tabu(TabuList),
    Annealing { temperature: f64, cooling_rate: f64 },
    Descent,
}

impl Acceptor {
    pub fn from_policy(policy: &AcceptancePolicy) -> Self {
        match *policy {
            AcceptancePolicy::Tabu { tabu_list_size } => Acceptor::Tabu(TabuList::new(tabu_list_size)),
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
            } => Acceptor::Annealing {
                temperature: initial_temperature,
                cooling_rate,
            },
            AcceptancePolicy::Descent => Acceptor::Descent,
        }
    }

    /// Record a solution the search has moved to outside of [`Acceptor::select`].
    pub fn remember(&mut self, solution: &Solution) {
        if let Acceptor::Tabu(tabu) = self {
            tabu.push(solution.signature());
        }
    }

    /// Pick the neighbor to move to, if any is acceptable.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        current: &Solution,
        mut candidates: Vec<Neighbor>,
        rng: &mut R,
    ) -> Option<Neighbor> {
        if candidates.is_empty() {
            return None;
        }

        match self {
            Acceptor::Tabu(tabu) => {
                candidates.sort_by(|a, b| a.cost.total_cmp(&b.cost));
                let (neighbor, signature) = candidates.into_iter().find_map(|n| {
                    let signature = n.signature(current);
                    if tabu.contains(&signature) {
                        None
                    } else {
                        Some((n, signature))
                    }
                })?;
                tabu.push(signature);
                Some(neighbor)
            }
            Acceptor::Annealing { temperature, .. } => {
                let neighbor = cheapest(candidates)?;
                let delta = neighbor.cost - current.cost();

                if delta < 0.0 {
                    return Some(neighbor);
                }
                if *temperature <= 0.0 {
                    return None;
                }

                let probability = (-delta / *temperature).exp();
                let draw: f64 = rng.gen();
                trace!("Worse candidate (+{:.3}) accepted with p = {:.4}", delta, probability);
                (draw < probability).then_some(neighbor)
            }
            Acceptor::Descent => cheapest(candidates).filter(Neighbor::is_improving),
        }
    }

    /// Advance the cooling schedule by one iteration.
    pub fn cool(&mut self) {
        if let Acceptor::Annealing {
            temperature,
            cooling_rate,
        } = self
        {
            *temperature *= *cooling_rate;
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        match self {
            Acceptor::Annealing { temperature, .. } => Some(*temperature),
            _ => None,
        }
    }
}
