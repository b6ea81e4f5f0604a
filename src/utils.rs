//! Reporting helpers: solution output and search statistics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::problem::Problem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a human-readable listing of a solution to a file.
pub fn save_solution<P: AsRef<Path>>(solution: &Solution, problem: &Problem, path: P) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "VRPTW Solution for instance: {}", problem.name)?;
    writeln!(file, "Total Distance: {:.2}", solution.cost())?;
    writeln!(
        file,
        "Vehicles Used: {} / {}",
        solution.used_route_count(),
        solution.route_count()
    )?;
    writeln!(file)?;

    for (i, route) in solution.routes().iter().enumerate() {
        write!(file, "Route #{}: ", i + 1)?;

        if route.is_empty() {
            writeln!(file, "Empty")?;
            continue;
        }

        let path: Vec<String> = route
            .visits()
            .iter()
            .map(|visit| format!("{}@{:.1}", problem.node(visit.stop).id, visit.service_start))
            .collect();
        writeln!(file, "{}", path.join(" -> "))?;

        writeln!(file, "  Distance: {:.2}", route.distance())?;
        writeln!(file, "  Load: {:.2} / {:.2}", route.load(), problem.vehicle_capacity)?;
        writeln!(file)?;
    }

    file.flush()?;
    Ok(())
}

/// Save a solution as a JSON [`SolutionReport`](crate::solution::SolutionReport).
pub fn save_solution_json<P: AsRef<Path>>(solution: &Solution, problem: &Problem, path: P) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, &solution.report(problem))?;
    Ok(())
}

/// Statistics about a finished search.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    pub iterations: u32,
    pub runtime: Duration,
    pub accepted_moves: u32,
    pub diversifications: u32,
    pub best_solution_cost: f64,
    pub best_solution_routes: usize,
    /// Only set under simulated annealing
    pub final_temperature: Option<f64>,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        let mut text = format!(
            "Search Statistics:
- Iterations: {}
- Runtime: {}
- Accepted Moves: {}
- Diversifications: {}
- Best Solution Cost: {:.2}
- Best Solution Routes: {}",
            self.iterations,
            format_duration(self.runtime),
            self.accepted_moves,
            self.diversifications,
            self.best_solution_cost,
            self.best_solution_routes,
        );
        if let Some(temperature) = self.final_temperature {
            text.push_str(&format!("\n- Final Temperature: {:.4}", temperature));
        }
        text
    }
}

/// Print solution visualization to console.
pub fn print_solution_visualization(solution: &Solution, problem: &Problem) {
    println!("Solution Visualization for {}", problem.name);
    println!("Total Distance: {:.2}", solution.cost());
    println!("Vehicles Used: {}", solution.used_route_count());
    println!();

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for node in &problem.nodes {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x);
        max_y = max_y.max(node.y);
    }

    let width = 80;
    let height = 25;
    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);
    let cell = |x: f64, y: f64| {
        let col = ((x - min_x) / span_x * (width as f64 - 1.0)) as usize;
        let row = ((y - min_y) / span_y * (height as f64 - 1.0)) as usize;
        (row.min(height - 1), col.min(width - 1))
    };

    let mut grid = vec![vec![' '; width]; height];

    let route_symbols = ['*', '+', 'x', '#', '@', '&', '%', '=', '^', '$'];
    let used: Vec<_> = solution.routes().iter().filter(|r| !r.is_empty()).collect();

    for (r_idx, route) in used.iter().enumerate() {
        let symbol = route_symbols[r_idx % route_symbols.len()];
        for customer in route.customers() {
            let node = &problem.nodes[customer];
            let (row, col) = cell(node.x, node.y);
            grid[row][col] = symbol;
        }
    }

    let depot = problem.depot();
    let (row, col) = cell(depot.x, depot.y);
    grid[row][col] = 'D';

    // Row 0 is the smallest y, print it last
    for row in grid.iter().rev() {
        println!("{}", row.iter().collect::<String>());
    }
    println!();

    println!("Legend:");
    println!("D - Depot");
    for (r_idx, _) in used.iter().enumerate().take(route_symbols.len()) {
        println!("{} - Route #{}", route_symbols[r_idx], r_idx + 1);
    }
    println!();
}
