use chrono::NaiveDate;
use roadlog::{
    Planner, TripRequest,
    hos::DutyCycle,
    planner::Error,
    route::{self, Leg, Operation, StaticDistanceTable},
    shared::{Duration, Miles, Time},
    stops::StopKind,
};

fn leg(miles: f64) -> Leg {
    Leg {
        distance: Miles::from_miles(miles),
        duration: None,
    }
}

fn table() -> StaticDistanceTable {
    StaticDistanceTable::new()
        .with_leg("Atlanta, GA", "Nashville, TN", leg(250.0))
        .with_leg("Nashville, TN", "Chicago, IL", leg(475.0))
        .with_leg("Dallas, TX", "Austin, TX", leg(50.0))
        .with_leg("Austin, TX", "Houston, TX", leg(50.0))
}

fn planner() -> Planner<StaticDistanceTable> {
    Planner::new(table()).start_date(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
}

fn atlanta_chicago() -> TripRequest {
    TripRequest {
        current_location: "Atlanta, GA".into(),
        pickup_location: "Nashville, TN".into(),
        dropoff_location: "Chicago, IL".into(),
        cycle: DutyCycle::SeventyHourEightDay,
        available_driving_hours: 11.0,
    }
}

fn texas_triangle() -> TripRequest {
    TripRequest {
        current_location: "Dallas, TX".into(),
        pickup_location: "Austin, TX".into(),
        dropoff_location: "Houston, TX".into(),
        cycle: DutyCycle::SeventyHourEightDay,
        available_driving_hours: 11.0,
    }
}

#[test]
fn long_trip_plans_end_to_end() {
    let plan = planner().plan_trip(&atlanta_chicago()).unwrap();

    // 725 miles at 65 mph comes out just over the 11 available hours.
    assert!(!plan.compliance.is_compliant);
    assert_eq!(plan.compliance.violations.len(), 1);
    assert!(plan.compliance.violations[0].starts_with("Trip requires 11."));
    assert!(
        plan.compliance.violations[0].contains("only 11.0 hours available"),
    );

    assert_eq!(plan.route.segments().len(), 2);
    assert_eq!(plan.route.segments()[0].operation, Some(Operation::Pickup));
    assert_eq!(plan.route.segments()[1].operation, Some(Operation::Dropoff));
    assert!((plan.route.total_distance().as_miles() - 725.0).abs() < 1e-9);

    let rests = plan
        .stops
        .iter()
        .filter(|stop| stop.kind == StopKind::LongRest)
        .count();
    assert_eq!(rests, 1);

    assert_eq!(plan.logs.len(), 2);
    let total: f64 = plan
        .logs
        .iter()
        .map(|log| log.total_miles.as_miles())
        .sum();
    assert!((total - 725.0).abs() < 1e-9);
}

#[test]
fn short_trip_fits_one_day() {
    let plan = planner().plan_trip(&texas_triangle()).unwrap();

    assert!(plan.compliance.is_compliant);
    assert!(plan.stops.is_empty());
    assert_eq!(plan.logs.len(), 1);
    assert!((plan.logs[0].total_miles.as_miles() - 100.0).abs() < 1e-9);
}

#[test]
fn late_departure_splits_a_short_trip_across_midnight() {
    let plan = planner()
        .departure_at(Time::from_hhmm("23:00").unwrap())
        .plan_trip(&texas_triangle())
        .unwrap();

    assert!(plan.compliance.is_compliant);
    assert!(plan.stops.is_empty());
    // Loading straddles midnight: 46 driving minutes and 50 miles land on
    // each calendar day.
    assert_eq!(plan.logs.len(), 2);
    assert!((plan.logs[0].total_miles.as_miles() - 50.0).abs() < 1e-9);
    assert!((plan.logs[1].total_miles.as_miles() - 50.0).abs() < 1e-9);
    assert_eq!(
        plan.logs[1].intervals[0].remarks.as_deref(),
        Some("Loading at shipper")
    );
    assert_eq!(plan.logs[0].date.succ_opt().unwrap(), plan.logs[1].date);
}

#[test]
fn staged_calls_match_the_full_pipeline() {
    let planner = planner();
    let trip = atlanta_chicago();

    let route_plan = planner.plan_route(&trip).unwrap();
    let stops = planner.plan_stops(&route_plan.route);
    let logs = planner
        .generate_logs(&trip, &route_plan.route, &stops)
        .unwrap();

    let plan = planner.plan_trip(&trip).unwrap();
    assert_eq!(plan.route, route_plan.route);
    assert_eq!(plan.compliance, route_plan.compliance);
    assert_eq!(plan.stops, stops);
    assert_eq!(plan.logs, logs);
}

#[test]
fn planning_twice_gives_identical_plans() {
    let planner = planner();
    let trip = atlanta_chicago();
    assert_eq!(
        planner.plan_trip(&trip).unwrap(),
        planner.plan_trip(&trip).unwrap()
    );
}

#[test]
fn unknown_location_is_a_route_error() {
    let trip = TripRequest {
        current_location: "Nowhere, KS".into(),
        ..atlanta_chicago()
    };
    let result = planner().plan_trip(&trip);
    assert!(matches!(
        result,
        Err(Error::Route(route::Error::Lookup { .. }))
    ));
}

#[test]
fn provider_duration_overrides_the_speed_rule() {
    let table = StaticDistanceTable::new()
        .with_leg(
            "Dallas, TX",
            "Austin, TX",
            Leg {
                distance: Miles::from_miles(50.0),
                duration: Some(Duration::from_minutes(90)),
            },
        )
        .with_leg("Austin, TX", "Houston, TX", leg(50.0));
    let planner = Planner::new(table);
    let plan = planner.plan_route(&texas_triangle()).unwrap();

    let segments = plan.route.segments();
    assert_eq!(segments[0].driving_time, Duration::from_minutes(90));
    // 50 miles at 65 mph, rounded to the nearest minute.
    assert_eq!(segments[1].driving_time, Duration::from_minutes(46));
}

#[test]
fn compliance_violations_do_not_abort_log_generation() {
    let trip = TripRequest {
        available_driving_hours: 1.0,
        ..atlanta_chicago()
    };
    let plan = planner().plan_trip(&trip).unwrap();
    assert!(!plan.compliance.is_compliant);
    assert_eq!(plan.logs.len(), 2);
}
