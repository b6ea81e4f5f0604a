//! Problem definition and data structures for the VRPTW.

use crate::error::{Result, VrptwError};
use crate::solution::Stop;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Index of the depot in [`Problem::nodes`].
pub const DEPOT: usize = 0;

/// A customer (or the depot) with its service time window.
///
/// The time a vehicle actually starts serving a customer depends on the route
/// it is visited in, so it is stored on the route's visits, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub demand: f64,
    /// Earliest service start
    pub window_start: f64,
    /// Latest service start
    pub window_end: f64,
    pub service_duration: f64,
}

impl Customer {
    /// Create a new customer.
    pub fn new(
        id: usize,
        x: f64,
        y: f64,
        demand: f64,
        window_start: f64,
        window_end: f64,
        service_duration: f64,
    ) -> Self {
        Customer {
            id,
            x,
            y,
            demand,
            window_start,
            window_end,
            service_duration,
        }
    }

    /// Calculate the Euclidean distance between two customers.
    pub fn distance(&self, other: &Customer) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A vehicle of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub capacity: f64,
}

/// Raw instance as handed over by a data source. Customer `0` is the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    #[serde(default)]
    pub name: String,
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
}

/// A validated VRPTW instance with a homogeneous fleet.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub name: String,
    /// All nodes, the depot first
    pub nodes: Vec<Customer>,
    pub vehicle_capacity: f64,
    pub fleet_size: usize,
    #[serde(skip)]
    distance_matrix: Vec<Vec<f64>>,
}

impl Problem {
    /// Create a new VRPTW problem. `nodes[0]` is the depot.
    ///
    /// Fails with [`VrptwError::InvalidInstance`] when the instance is malformed.
    pub fn new(
        name: String,
        nodes: Vec<Customer>,
        vehicle_capacity: f64,
        fleet_size: usize,
    ) -> Result<Self> {
        let distance_matrix = Self::compute_distance_matrix(&nodes);

        let problem = Problem {
            name,
            nodes,
            vehicle_capacity,
            fleet_size,
            distance_matrix,
        };
        problem.validate()?;

        debug!(
            "Loaded problem {} with {} customers, {} vehicles of capacity {}",
            problem.name,
            problem.customer_count(),
            problem.fleet_size,
            problem.vehicle_capacity
        );

        Ok(problem)
    }

    /// Build a problem from raw instance data, locating the depot (id `0`).
    pub fn from_instance(data: InstanceData) -> Result<Self> {
        let InstanceData {
            name,
            mut customers,
            vehicles,
        } = data;

        let capacity = match vehicles.first() {
            Some(vehicle) => vehicle.capacity,
            None => {
                return Err(VrptwError::InvalidInstance(
                    "the fleet has no vehicles".to_string(),
                ))
            }
        };
        if vehicles.iter().any(|v| v.capacity != capacity) {
            return Err(VrptwError::InvalidInstance(
                "vehicles must share the same capacity".to_string(),
            ));
        }

        let depot_position = customers
            .iter()
            .position(|c| c.id == 0)
            .ok_or_else(|| VrptwError::InvalidInstance("missing depot (id 0)".to_string()))?;
        customers.swap(0, depot_position);

        Problem::new(name, customers, capacity, vehicles.len())
    }

    /// Load a problem from a JSON file holding [`InstanceData`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let data: InstanceData = serde_json::from_str(&content)?;
        Problem::from_instance(data)
    }

    /// Load a problem from a file in Solomon's benchmark format.
    pub fn from_solomon_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Problem::from_solomon_str(&content)
    }

    /// Parse a problem in Solomon's benchmark format.
    ///
    /// The first text line is the instance name; a row of two numbers gives
    /// the fleet size and capacity; rows of seven numbers are customers
    /// (`id x y demand ready due service`). Header lines are skipped.
    pub fn from_solomon_str(content: &str) -> Result<Self> {
        let mut name: Option<String> = None;
        let mut fleet: Option<(usize, f64)> = None;
        let mut customers = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            let line_no = line_idx + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let numbers: Option<Vec<f64>> = tokens.iter().map(|t| t.parse::<f64>().ok()).collect();
            let numbers = match numbers {
                Some(numbers) => numbers,
                None => {
                    if name.is_none() {
                        name = Some(line.trim().to_string());
                    }
                    continue;
                }
            };

            match numbers.len() {
                2 if fleet.is_none() => {
                    let count = parse_count(numbers[0], line_no)?;
                    fleet = Some((count, numbers[1]));
                }
                7 => {
                    let id = parse_count(numbers[0], line_no)?;
                    customers.push(Customer::new(
                        id, numbers[1], numbers[2], numbers[3], numbers[4], numbers[5], numbers[6],
                    ));
                }
                n => {
                    return Err(VrptwError::Parse {
                        line: line_no,
                        message: format!("unexpected row with {} numeric fields", n),
                    })
                }
            }
        }

        let (fleet_size, capacity) = fleet.ok_or(VrptwError::Parse {
            line: 0,
            message: "missing VEHICLE section".to_string(),
        })?;

        Problem::from_instance(InstanceData {
            name: name.unwrap_or_default(),
            customers,
            vehicles: vec![Vehicle { capacity }; fleet_size],
        })
    }

    /// Check the instance before any construction starts.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(VrptwError::InvalidInstance(msg));

        if self.nodes.is_empty() {
            return invalid("missing depot".to_string());
        }
        if self.fleet_size == 0 {
            return invalid("the fleet has no vehicles".to_string());
        }
        if !self.vehicle_capacity.is_finite() || self.vehicle_capacity < 0.0 {
            return invalid(format!(
                "vehicle capacity must be non-negative, got {}",
                self.vehicle_capacity
            ));
        }
        let depot = &self.nodes[DEPOT];
        if depot.demand != 0.0 {
            return invalid("the depot must have zero demand".to_string());
        }
        if depot.window_start + depot.service_duration > depot.window_end {
            return invalid("the depot time window cannot fit its own service".to_string());
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return invalid(format!("duplicate customer id {}", node.id));
            }
            if !(node.x.is_finite() && node.y.is_finite()) {
                return invalid(format!("customer {} has non-finite coordinates", node.id));
            }
            if !node.demand.is_finite() || node.demand < 0.0 {
                return invalid(format!("customer {} has negative demand", node.id));
            }
            if !node.service_duration.is_finite() || node.service_duration < 0.0 {
                return invalid(format!(
                    "customer {} has negative service duration",
                    node.id
                ));
            }
            if node.window_start.is_nan()
                || node.window_end.is_nan()
                || node.window_start > node.window_end
            {
                return invalid(format!(
                    "customer {} has an empty time window [{}, {}]",
                    node.id, node.window_start, node.window_end
                ));
            }
        }

        Ok(())
    }

    /// Distance between the locations of two stops.
    #[inline]
    pub fn distance(&self, from: Stop, to: Stop) -> f64 {
        self.distance_matrix[from.node_index()][to.node_index()]
    }

    /// The node a stop refers to. Both depot endpoints map to the depot.
    #[inline]
    pub fn node(&self, stop: Stop) -> &Customer {
        &self.nodes[stop.node_index()]
    }

    /// Get the depot node.
    pub fn depot(&self) -> &Customer {
        &self.nodes[DEPOT]
    }

    /// Get the number of customers (excluding the depot).
    pub fn customer_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Indices of all non-depot customers.
    pub fn customer_indices(&self) -> std::ops::Range<usize> {
        1..self.nodes.len()
    }

    /// Index of the customer with the given id.
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> f64 {
        self.nodes[1..].iter().map(|n| n.demand).sum()
    }

    /// Generate the full distance matrix for all nodes.
    fn compute_distance_matrix(nodes: &[Customer]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = nodes[i].distance(&nodes[j]);
                }
            }
        }

        matrix
    }
}

fn parse_count(value: f64, line: usize) -> Result<usize> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(VrptwError::Parse {
            line,
            message: format!("expected a non-negative integer, got {}", value),
        });
    }
    Ok(value as usize)
}
