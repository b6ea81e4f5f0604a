//! Command line solver for VRPTW instances.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{debug, error, info, LevelFilter};

use vrptw_heuristics::config::{AcceptancePolicy, Config};
use vrptw_heuristics::problem::Problem;
use vrptw_heuristics::utils::{save_solution, save_solution_json};
use vrptw_heuristics::{Result, VrptwSolver};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Solomon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Tabu,
    Annealing,
    Descent,
}

#[derive(Parser)]
#[command(version, about, author, long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, value_name = "FILE")]
    instance: PathBuf,

    #[arg(short, long, value_enum, default_value = "solomon")]
    format: Format,

    /// JSON configuration file, overridden by the flags below
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    policy: Option<Policy>,

    #[arg(long, value_name = "N")]
    iterations: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Time limit in seconds
    #[arg(long = "time-limit", value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Write the solution here: JSON for a `.json` path, plain text otherwise
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
    debug!("Verbose level: {}", cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let problem = match cli.format {
        Format::Json => Problem::from_json_file(&cli.instance)?,
        Format::Solomon => Problem::from_solomon_file(&cli.instance)?,
    };
    info!(
        "Loaded {} with {} customers and {} vehicles",
        problem.name,
        problem.customer_count(),
        problem.fleet_size
    );

    let config = build_config(&cli)?;
    debug!("Configuration: {:?}", config);

    let mut solver = VrptwSolver::new(problem, config)?;
    let best = solver.run()?.clone();

    println!(
        "{}: cost {:.2}, {} vehicles",
        solver.problem.name,
        best.cost(),
        best.used_route_count()
    );
    println!("{}", solver.statistics().format());

    if let Some(path) = &cli.output {
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json {
            save_solution_json(&best, &solver.problem, path)?;
        } else {
            save_solution(&best, &solver.problem, path)?;
        }
        info!("Solution written to {}", path.display());
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::new(),
    };

    if let Some(policy) = cli.policy {
        config.acceptance = match (policy, config.acceptance) {
            // Keep parameters from the configuration file when the kind matches
            (Policy::Tabu, current @ AcceptancePolicy::Tabu { .. }) => current,
            (Policy::Annealing, current @ AcceptancePolicy::SimulatedAnnealing { .. }) => current,
            (Policy::Tabu, _) => AcceptancePolicy::default(),
            (Policy::Annealing, _) => AcceptancePolicy::SimulatedAnnealing {
                initial_temperature: 100.0,
                cooling_rate: 0.99,
            },
            (Policy::Descent, _) => AcceptancePolicy::Descent,
        };
    }
    if let Some(iterations) = cli.iterations {
        config = config.with_iteration_count(iterations);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(seconds) = cli.time_limit {
        config = config.with_time_limit_secs(seconds)?;
    }

    config.validate()?;
    Ok(config)
}
