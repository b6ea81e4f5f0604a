//! Tests for the insertion heuristic that builds initial solutions.

use vrptw_heuristics::config::InsertionParams;
use vrptw_heuristics::construction::{seed_route, InsertionHeuristic};
use vrptw_heuristics::insertion::{best_insertion, insertion_value};
use vrptw_heuristics::problem::{Customer, Problem};
use vrptw_heuristics::solution::{Route, Stop};
use vrptw_heuristics::VrptwError;

/// Creates a test problem with six customers around the depot.
fn create_test_problem() -> Problem {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 1.0, 0.0, 200.0, 5.0),
        Customer::new(2, 0.0, 10.0, 1.0, 0.0, 200.0, 5.0),
        Customer::new(3, 10.0, 10.0, 1.0, 50.0, 300.0, 5.0),
        Customer::new(4, 20.0, 0.0, 1.5, 0.0, 300.0, 5.0),
        Customer::new(5, 20.0, 10.0, 2.0, 100.0, 400.0, 5.0),
        Customer::new(6, -10.0, -10.0, 2.0, 0.0, 500.0, 5.0),
    ];

    Problem::new("ConstructionProblem".to_string(), nodes, 5.0, 4).unwrap()
}

#[test]
fn test_single_customer_service_start() {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 5.0, 10.0, 20.0, 0.0),
    ];
    let problem = Problem::new("SingleCustomer".to_string(), nodes, 10.0, 1).unwrap();

    let solution = InsertionHeuristic::new(&problem, InsertionParams::default())
        .construct()
        .unwrap();

    let route = solution.route(0);
    assert_eq!(route.stops(), vec![Stop::Depot, Stop::Customer(1), Stop::Return]);
    assert_eq!(route.visits()[1].service_start, 10.0);
    assert_eq!(route.load(), 5.0);
    assert_eq!(solution.cost(), 20.0);
}

#[test]
fn test_construction_routes_every_customer_once() {
    let problem = create_test_problem();

    let solution = InsertionHeuristic::new(&problem, InsertionParams::default())
        .construct()
        .unwrap();

    assert!(solution.is_complete(&problem));
    assert_eq!(solution.routed_customer_count(), problem.customer_count());
    assert_eq!(solution.route_count(), problem.fleet_size);
    assert!((solution.total_load() - problem.total_demand()).abs() < 1e-9);

    for route in solution.routes() {
        assert!(route.load() <= problem.vehicle_capacity);
        for visit in route.visits() {
            assert!(visit.service_start <= problem.node(visit.stop).window_end);
        }
    }

    let summed: f64 = solution.routes().iter().map(|r| r.distance()).sum();
    assert!((solution.cost() - summed).abs() < 1e-9);
}

#[test]
fn test_construction_is_deterministic() {
    let problem = create_test_problem();
    let heuristic = InsertionHeuristic::new(&problem, InsertionParams::default());

    assert_eq!(heuristic.construct().unwrap(), heuristic.construct().unwrap());
}

#[test]
fn test_fleet_exhausted() {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 6.0, 0.0, 1000.0, 0.0),
        Customer::new(2, 20.0, 0.0, 6.0, 0.0, 1000.0, 0.0),
    ];
    let problem = Problem::new("OneTruck".to_string(), nodes, 10.0, 1).unwrap();

    // The farther customer seeds the only route, the other one no longer fits.
    match InsertionHeuristic::new(&problem, InsertionParams::default()).construct() {
        Err(VrptwError::Unroutable { customers }) => assert_eq!(customers, vec![1]),
        other => panic!("expected unroutable customers, got {:?}", other),
    }
}

#[test]
fn test_customer_unreachable_alone() {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 1.0, 0.0, 1000.0, 0.0),
        Customer::new(3, 8.0, 0.0, 1.0, 0.0, 5.0, 0.0),
    ];
    let problem = Problem::new("Unreachable".to_string(), nodes, 10.0, 3).unwrap();

    match InsertionHeuristic::new(&problem, InsertionParams::default()).construct() {
        Err(VrptwError::Unroutable { customers }) => assert_eq!(customers, vec![3]),
        other => panic!("expected unroutable customers, got {:?}", other),
    }
}

#[test]
fn test_seed_is_farthest_feasible_customer() {
    let nodes = vec![
        Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        Customer::new(1, 10.0, 0.0, 1.0, 0.0, 1000.0, 0.0),
        Customer::new(2, 20.0, 0.0, 1.0, 0.0, 1000.0, 0.0),
        // Farthest, but its window closes before anyone can get there
        Customer::new(3, 30.0, 0.0, 1.0, 0.0, 5.0, 0.0),
    ];
    let problem = Problem::new("Seeds".to_string(), nodes, 10.0, 2).unwrap();

    let (idx, route) = seed_route(&problem, &[1, 2, 3]).unwrap();
    assert_eq!(idx, 1);
    assert_eq!(route.customers().collect::<Vec<_>>(), vec![2]);

    assert!(seed_route(&problem, &[3]).is_none());
}

#[test]
fn test_insertion_value() {
    let problem = create_test_problem();
    let params = InsertionParams::default();
    let empty = Route::empty(&problem);

    // c11 = 10 + 10 - 0 = 20, c12 = (10 + 5 + 10) - 0 = 25
    // value = 2 * 10 - (0.5 * 20 + 0.5 * 25)
    let value = insertion_value(&problem, &empty, 1, 1, &params);
    assert!((value + 2.5).abs() < 1e-9);
}

#[test]
fn test_best_insertion_prefers_highest_value() {
    let problem = create_test_problem();
    let params = InsertionParams::default();
    let empty = Route::empty(&problem);
    let candidates = [1, 2, 4];

    let best = best_insertion(&problem, [(0, &empty)], &candidates, &params).unwrap();
    for &candidate in &candidates {
        assert!(best.value >= insertion_value(&problem, &empty, 1, candidate, &params));
    }
    assert_eq!(best.route, 0);
    assert_eq!(best.position, 1);
    assert!(best.result.position_of(best.customer).is_some());
}
