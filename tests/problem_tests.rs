//! Tests for instance loading and validation.

use vrptw_heuristics::problem::{Customer, InstanceData, Problem, Vehicle};
use vrptw_heuristics::solution::Stop;
use vrptw_heuristics::VrptwError;

const SOLOMON_SAMPLE: &str = "C_TEST

VEHICLE
NUMBER     CAPACITY
  3         200

CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME

    0      40         50          0          0       1236          0
    1      45         68         10        912        967         90
    2      45         70         30        825        870         90
";

/// Creates the raw data of a small instance with the depot listed last.
fn create_test_instance() -> InstanceData {
    InstanceData {
        name: "TestInstance".to_string(),
        customers: vec![
            Customer::new(1, 10.0, 0.0, 1.0, 0.0, 100.0, 0.0),
            Customer::new(2, 0.0, 10.0, 2.0, 0.0, 100.0, 0.0),
            Customer::new(0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.0),
        ],
        vehicles: vec![Vehicle { capacity: 10.0 }; 2],
    }
}

fn assert_invalid(result: Result<Problem, VrptwError>) {
    match result {
        Err(VrptwError::InvalidInstance(_)) => {}
        other => panic!("expected an invalid instance error, got {:?}", other),
    }
}

#[test]
fn test_from_instance_moves_depot_first() {
    let problem = Problem::from_instance(create_test_instance()).unwrap();

    assert_eq!(problem.nodes[0].id, 0);
    assert_eq!(problem.customer_count(), 2);
    assert_eq!(problem.fleet_size, 2);
    assert_eq!(problem.vehicle_capacity, 10.0);
    assert_eq!(problem.total_demand(), 3.0);
    assert!(problem.index_of(1).is_some());
    assert!(problem.index_of(7).is_none());
}

#[test]
fn test_distances() {
    let problem = Problem::from_instance(create_test_instance()).unwrap();
    let one = problem.index_of(1).unwrap();
    let two = problem.index_of(2).unwrap();

    assert_eq!(problem.distance(Stop::Depot, Stop::Customer(one)), 10.0);
    assert_eq!(problem.distance(Stop::Customer(two), Stop::Return), 10.0);
    let diagonal = problem.distance(Stop::Customer(one), Stop::Customer(two));
    assert!((diagonal - 200f64.sqrt()).abs() < 1e-9);
    assert_eq!(diagonal, problem.distance(Stop::Customer(two), Stop::Customer(one)));
    assert_eq!(problem.distance(Stop::Depot, Stop::Return), 0.0);
}

#[test]
fn test_json_instance() {
    let json = r#"{
        "name": "json",
        "customers": [
            {"id": 0, "x": 0.0, "y": 0.0, "demand": 0.0, "window_start": 0.0, "window_end": 500.0, "service_duration": 0.0},
            {"id": 1, "x": 3.0, "y": 4.0, "demand": 2.0, "window_start": 0.0, "window_end": 50.0, "service_duration": 1.0}
        ],
        "vehicles": [{"capacity": 5.0}]
    }"#;

    let data: InstanceData = serde_json::from_str(json).unwrap();
    let problem = Problem::from_instance(data).unwrap();

    assert_eq!(problem.name, "json");
    assert_eq!(problem.distance(Stop::Depot, Stop::Customer(1)), 5.0);
}

#[test]
fn test_solomon_parsing() {
    let problem = Problem::from_solomon_str(SOLOMON_SAMPLE).unwrap();

    assert_eq!(problem.name, "C_TEST");
    assert_eq!(problem.fleet_size, 3);
    assert_eq!(problem.vehicle_capacity, 200.0);
    assert_eq!(problem.customer_count(), 2);

    let second = &problem.nodes[2];
    assert_eq!(second.id, 2);
    assert_eq!(second.demand, 30.0);
    assert_eq!(second.window_start, 825.0);
    assert_eq!(second.window_end, 870.0);
    assert_eq!(second.service_duration, 90.0);
}

#[test]
fn test_solomon_malformed_row() {
    let content = SOLOMON_SAMPLE.replace("    2      45         70         30        825        870         90", "    2      45  70");

    match Problem::from_solomon_str(&content) {
        Err(VrptwError::Parse { line, .. }) => assert_eq!(line, 12),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_solomon_missing_fleet() {
    let content = "NO_FLEET\n0 0 0 0 0 100 0\n1 1 1 1 0 100 0\n";

    assert!(matches!(
        Problem::from_solomon_str(content),
        Err(VrptwError::Parse { line: 0, .. })
    ));
}

#[test]
fn test_missing_depot() {
    let mut data = create_test_instance();
    data.customers.retain(|c| c.id != 0);
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_no_vehicles() {
    let mut data = create_test_instance();
    data.vehicles.clear();
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_mixed_capacities() {
    let mut data = create_test_instance();
    data.vehicles[1].capacity = 20.0;
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_negative_capacity() {
    let mut data = create_test_instance();
    for vehicle in &mut data.vehicles {
        vehicle.capacity = -1.0;
    }
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_inverted_window() {
    let mut data = create_test_instance();
    data.customers[0].window_start = 200.0;
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_negative_demand_and_service() {
    let mut data = create_test_instance();
    data.customers[1].demand = -2.0;
    assert_invalid(Problem::from_instance(data));

    let mut data = create_test_instance();
    data.customers[1].service_duration = -1.0;
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_duplicate_ids() {
    let mut data = create_test_instance();
    data.customers[1].id = 1;
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_non_finite_coordinates() {
    let mut data = create_test_instance();
    data.customers[0].x = f64::NAN;
    assert_invalid(Problem::from_instance(data));
}

#[test]
fn test_missing_file() {
    let result = Problem::from_json_file("does/not/exist.json");
    assert!(matches!(result, Err(VrptwError::Io(_))));
}
