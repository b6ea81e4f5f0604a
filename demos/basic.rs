//! Basic example of using the VRPTW heuristics library.

use std::env;
use std::time::{Duration, Instant};

use vrptw_heuristics::config::{AcceptancePolicy, Config, DiversificationParams};
use vrptw_heuristics::problem::Problem;
use vrptw_heuristics::utils::{format_duration, print_solution_visualization, save_solution_json};
use vrptw_heuristics::VrptwSolver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get instance path from command line or use default
    let args: Vec<String> = env::args().collect();
    let instance_path = if args.len() > 1 {
        &args[1]
    } else {
        "instances/C101.txt"
    };

    println!("Loading problem from: {}", instance_path);
    let problem = Problem::from_solomon_file(instance_path)?;
    println!(
        "Loaded problem: {} with {} customers",
        problem.name,
        problem.customer_count()
    );

    let config = Config::new()
        .with_iteration_count(2000)
        .with_acceptance(AcceptancePolicy::Tabu { tabu_list_size: 20 })
        .with_diversification(DiversificationParams {
            min_remove: 3,
            max_remove: 10,
            non_improving_threshold: 50,
        })
        .with_seed(7)
        .with_time_limit(Duration::from_secs(60));

    println!("Initializing solver");
    let mut solver = VrptwSolver::new(problem, config)?;

    println!("Starting search (time limit: 60s)");
    let start_time = Instant::now();
    let best_solution = solver.run()?.clone();
    let runtime = start_time.elapsed();

    println!("Search completed in {}", format_duration(runtime));
    println!("Best solution distance: {:.2}", best_solution.cost());
    println!("Vehicles used: {}", best_solution.used_route_count());
    println!("{}", solver.statistics().format());

    let output_path = format!("{}.json", solver.problem.name);
    println!("Saving solution to: {}", output_path);
    save_solution_json(&best_solution, &solver.problem, &output_path)?;

    print_solution_visualization(&best_solution, &solver.problem);

    Ok(())
}
