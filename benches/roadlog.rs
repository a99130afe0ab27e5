use criterion::{Criterion, criterion_group, criterion_main};
use roadlog::{
    Planner, TripRequest,
    hos::DutyCycle,
    route::{Leg, StaticDistanceTable},
    shared::Miles,
};
use std::hint::black_box;

fn leg(miles: f64) -> Leg {
    Leg {
        distance: Miles::from_miles(miles),
        duration: None,
    }
}

fn short_trip(planner: &Planner<StaticDistanceTable>) {
    let trip = TripRequest {
        current_location: "Dallas, TX".into(),
        pickup_location: "Austin, TX".into(),
        dropoff_location: "Houston, TX".into(),
        cycle: DutyCycle::SeventyHourEightDay,
        available_driving_hours: 11.0,
    };
    let _ = black_box(planner.plan_trip(&trip));
}

fn multi_day_trip(planner: &Planner<StaticDistanceTable>) {
    let trip = TripRequest {
        current_location: "Atlanta, GA".into(),
        pickup_location: "Nashville, TN".into(),
        dropoff_location: "Los Angeles, CA".into(),
        cycle: DutyCycle::SeventyHourEightDay,
        available_driving_hours: 11.0,
    };
    let _ = black_box(planner.plan_trip(&trip));
}

fn criterion_benchmark(c: &mut Criterion) {
    let table = StaticDistanceTable::new()
        .with_leg("Dallas, TX", "Austin, TX", leg(195.0))
        .with_leg("Austin, TX", "Houston, TX", leg(165.0))
        .with_leg("Atlanta, GA", "Nashville, TN", leg(250.0))
        .with_leg("Nashville, TN", "Los Angeles, CA", leg(2000.0));
    let planner = Planner::new(table);

    let mut group = c.benchmark_group("Planning");

    group.bench_function("Short trip plan", |b| b.iter(|| short_trip(&planner)));

    group.bench_function("Multi-day trip plan", |b| {
        b.iter(|| multi_day_trip(&planner))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
