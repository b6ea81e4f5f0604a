//! Tests for the remove-and-reinsert diversification.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vrptw_heuristics::config::{DiversificationParams, InsertionParams};
use vrptw_heuristics::construction::InsertionHeuristic;
use vrptw_heuristics::diversifier::Diversifier;
use vrptw_heuristics::problem::{Customer, Problem};
use vrptw_heuristics::solution::Solution;

/// Creates a test problem with ten customers on two rings around the depot.
fn create_test_problem() -> Problem {
    let mut nodes = vec![Customer::new(0, 50.0, 50.0, 0.0, 0.0, 1000.0, 0.0)];
    for i in 1..=10 {
        let angle = i as f64 * std::f64::consts::PI / 5.0;
        let radius = if i % 2 == 0 { 20.0 } else { 35.0 };
        let open = (i as f64 - 1.0) * 20.0;
        nodes.push(Customer::new(
            i,
            50.0 + radius * angle.cos(),
            50.0 + radius * angle.sin(),
            1.0 + (i % 3) as f64,
            open,
            open + 400.0,
            10.0,
        ));
    }

    Problem::new("DiversifierProblem".to_string(), nodes, 10.0, 5).unwrap()
}

fn initial_solution(problem: &Problem) -> Solution {
    InsertionHeuristic::new(problem, InsertionParams::default())
        .construct()
        .unwrap()
}

fn assert_valid(problem: &Problem, solution: &Solution) {
    assert!(solution.is_complete(problem));
    assert_eq!(solution.route_count(), problem.fleet_size);
    assert!((solution.total_load() - problem.total_demand()).abs() < 1e-9);
    for route in solution.routes() {
        assert!(route.load() <= problem.vehicle_capacity);
        for visit in route.visits() {
            assert!(visit.service_start <= problem.node(visit.stop).window_end);
        }
    }
}

#[test]
fn test_diversify_keeps_solution_valid() {
    let problem = create_test_problem();
    let solution = initial_solution(&problem);
    let diversifier = Diversifier::new(&DiversificationParams::default(), InsertionParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut current = solution;
    for _ in 0..20 {
        current = diversifier.diversify(&problem, &current, &mut rng);
        assert_valid(&problem, &current);
    }
}

#[test]
fn test_diversify_with_fewer_customers_than_minimum() {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 1.0, 0.0, 1000.0, 0.0),
        Customer::new(2, 0.0, 10.0, 1.0, 0.0, 1000.0, 0.0),
    ];
    let problem = Problem::new("Tiny".to_string(), nodes, 5.0, 2).unwrap();
    let solution = initial_solution(&problem);

    let params = DiversificationParams {
        min_remove: 5,
        max_remove: 8,
        non_improving_threshold: 10,
    };
    let diversifier = Diversifier::new(&params, InsertionParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    assert_eq!(diversifier.removal_count(2, &mut rng), 2);
    let result = diversifier.diversify(&problem, &solution, &mut rng);
    assert_valid(&problem, &result);
}

#[test]
fn test_removal_count_range() {
    let params = DiversificationParams {
        min_remove: 2,
        max_remove: 4,
        non_improving_threshold: 10,
    };
    let diversifier = Diversifier::new(&params, InsertionParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..100 {
        let count = diversifier.removal_count(50, &mut rng);
        assert!((2..=4).contains(&count));
    }
    assert_eq!(diversifier.removal_count(0, &mut rng), 0);
}

#[test]
fn test_no_removal_keeps_solution() {
    let problem = create_test_problem();
    let solution = initial_solution(&problem);
    let params = DiversificationParams {
        min_remove: 0,
        max_remove: 0,
        non_improving_threshold: 10,
    };
    let diversifier = Diversifier::new(&params, InsertionParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert_eq!(diversifier.diversify(&problem, &solution, &mut rng), solution);
}

#[test]
fn test_diversify_is_reproducible() {
    let problem = create_test_problem();
    let solution = initial_solution(&problem);
    let diversifier = Diversifier::new(&DiversificationParams::default(), InsertionParams::default());

    let first = diversifier.diversify(&problem, &solution, &mut ChaCha8Rng::seed_from_u64(21));
    let second = diversifier.diversify(&problem, &solution, &mut ChaCha8Rng::seed_from_u64(21));

    assert_eq!(first, second);
}
