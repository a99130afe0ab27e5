use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    hos::HosRules,
    route::Route,
    shared::{Duration, Miles, Time, format_duration},
};

/// Wall-clock minute driving begins on day one when the caller does not say
/// otherwise: pre-trip inspection at 05:45, wheels rolling at 06:00.
pub const DEFAULT_TRIP_START: Time = Time::from_minutes(6 * 60);

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopKind {
    Fuel,
    ShortBreak,
    LongRest,
}

/// Exact point along the route where a stop was inserted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopPosition {
    /// Index of the segment the stop falls in.
    pub segment: usize,
    /// How far along that segment, 0.0..=1.0.
    pub fraction: f64,
    /// Absolute miles from the route start.
    pub route_miles: Miles,
}

impl StopPosition {
    /// Legacy placement fraction used when a stop's exact offset along its
    /// segment was never measured (hand-entered stops, older saved trips).
    pub const ASSUMED_FRACTION: f64 = 0.75;

    pub fn exact(segment: usize, fraction: f64, route_miles: Miles) -> Self {
        Self {
            segment,
            fraction,
            route_miles,
        }
    }

    /// Places the stop at the assumed fraction of its segment. Planner-built
    /// stops always carry exact positions; this exists for stops whose
    /// offset is unknown.
    pub fn assumed(segment: usize, miles_before_segment: Miles, segment_length: Miles) -> Self {
        Self {
            segment,
            fraction: Self::ASSUMED_FRACTION,
            route_miles: miles_before_segment + segment_length * Self::ASSUMED_FRACTION,
        }
    }
}

/// A mandated pause along the route. A long-rest stop is a day boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub location: Arc<str>,
    pub kind: StopKind,
    pub duration: Duration,
    pub arrival: Time,
    pub departure: Time,
    pub reason: String,
    pub position: StopPosition,
}

impl Stop {
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }
}

/// Walks the route accumulating distance since the last fuel stop, driving
/// time since the last break, and total driving time, and emits a stop at
/// the exact crossing point of each regulatory threshold.
pub struct StopPlanner<'a> {
    route: &'a Route,
    rules: &'a HosRules,
    departure: Time,
}

impl<'a> StopPlanner<'a> {
    pub fn new(route: &'a Route, rules: &'a HosRules) -> Self {
        Self {
            route,
            rules,
            departure: DEFAULT_TRIP_START,
        }
    }

    pub fn departure_at(mut self, departure: Time) -> Self {
        self.departure = departure;
        self
    }

    pub fn plan(&self) -> Vec<Stop> {
        let segments = self.route.segments();
        let mut stops = Vec::new();
        if segments.is_empty() {
            return stops;
        }

        let fuel_interval = self.rules.fuel_stop_interval().as_miles();
        let break_after = self.rules.driving_before_break().as_minutes() as f64;
        let daily = self.rules.max_daily_driving().as_minutes() as f64;

        let mut clock = self.departure.as_minutes() as f64;
        let mut miles_done = 0.0;
        let mut since_fuel = 0.0;
        let mut since_break = 0.0;
        let mut driven = 0.0;
        let mut rests = 0usize;

        let last_index = segments.len() - 1;
        for (index, segment) in segments.iter().enumerate() {
            let seg_miles = segment.distance.as_miles();
            let pace = segment.driving_time.as_minutes() as f64 / seg_miles;
            let mut offset = 0.0;

            loop {
                let remaining = seg_miles - offset;
                let triggers = [
                    (fuel_interval - since_fuel, StopKind::Fuel),
                    ((break_after - since_break) / pace, StopKind::ShortBreak),
                    (
                        ((rests + 1) as f64 * daily - driven) / pace,
                        StopKind::LongRest,
                    ),
                ];
                let next = triggers
                    .into_iter()
                    .filter(|(miles, _)| *miles <= remaining + EPS)
                    .min_by(|(a, _), (b, _)| a.total_cmp(b));

                let Some((trigger_miles, kind)) = next else {
                    clock += remaining * pace;
                    since_fuel += remaining;
                    since_break += remaining * pace;
                    driven += remaining * pace;
                    miles_done += remaining;
                    break;
                };

                let advance = trigger_miles.max(0.0);
                clock += advance * pace;
                since_fuel += advance;
                since_break += advance * pace;
                driven += advance * pace;
                miles_done += advance;
                offset += advance;

                // A stop exactly at the destination anchors nothing.
                if index == last_index && offset >= seg_miles - EPS {
                    break;
                }

                let arrival = Time::from_minutes(clock.round() as u32);
                let (duration, reason) = match kind {
                    StopKind::Fuel => {
                        since_fuel = 0.0;
                        (self.rules.fuel_stop_dwell(), "Required fuel stop".to_string())
                    }
                    StopKind::ShortBreak => {
                        since_break = 0.0;
                        (
                            self.rules.required_break(),
                            format!(
                                "Required {}-minute break after {} hours of driving",
                                self.rules.required_break_minutes,
                                self.rules.max_driving_before_break_hours
                            ),
                        )
                    }
                    StopKind::LongRest => {
                        rests += 1;
                        since_break = 0.0;
                        (
                            self.rules.min_off_duty(),
                            format!(
                                "Required {}-hour rest period after {} hours of driving",
                                self.rules.min_off_duty_hours, self.rules.max_driving_hours
                            ),
                        )
                    }
                };
                clock += duration.as_minutes() as f64;
                if kind == StopKind::LongRest {
                    // Next duty day opens with a fresh inspection.
                    clock += self.rules.pretrip().as_minutes() as f64;
                }
                stops.push(Stop {
                    location: segment.end_location.clone(),
                    kind,
                    duration,
                    arrival,
                    departure: arrival + duration,
                    reason,
                    position: StopPosition::exact(
                        index,
                        offset / seg_miles,
                        Miles::from_miles(miles_done),
                    ),
                });
            }

            if segment.operation.is_some() {
                clock += self.rules.pickup_dropoff_service().as_minutes() as f64;
            }
        }

        stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteSegment;

    fn segment(from: &str, to: &str, miles: f64, rules: &HosRules) -> RouteSegment {
        RouteSegment {
            start_location: from.into(),
            end_location: to.into(),
            distance: Miles::from_miles(miles),
            driving_time: rules.driving_time_for(Miles::from_miles(miles)),
            operation: None,
        }
    }

    #[test]
    fn short_route_yields_no_stops() {
        let rules = HosRules::default();
        let route = Route::new(vec![segment("A", "B", 100.0, &rules)]);
        let stops = StopPlanner::new(&route, &rules).plan();
        assert!(stops.is_empty());
    }

    #[test]
    fn break_and_rest_on_a_long_two_segment_route() {
        let rules = HosRules::default();
        let route = Route::new(vec![
            segment("Atlanta, GA", "Nashville, TN", 250.0, &rules),
            segment("Nashville, TN", "Chicago, IL", 475.0, &rules),
        ]);
        // 669 driving minutes total: crosses the 8 h break threshold and the
        // 11 h daily limit, but not the 1000 mi fuel interval.
        let stops = StopPlanner::new(&route, &rules).plan();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].kind, StopKind::ShortBreak);
        assert_eq!(stops[1].kind, StopKind::LongRest);
        assert!(stops.iter().all(|stop| stop.kind != StopKind::Fuel));
        // Both thresholds are crossed inside the second segment.
        assert_eq!(stops[0].position.segment, 1);
        assert_eq!(stops[1].position.segment, 1);
        assert!(stops[0].position.route_miles < stops[1].position.route_miles);
    }

    #[test]
    fn rest_stop_clock_is_consistent_with_accumulated_time() {
        let rules = HosRules::default();
        let route = Route::new(vec![
            segment("Atlanta, GA", "Nashville, TN", 250.0, &rules),
            segment("Nashville, TN", "Chicago, IL", 475.0, &rules),
        ]);
        let stops = StopPlanner::new(&route, &rules).plan();
        // Break: 06:00 departure + 480 min driving = 14:00.
        assert_eq!(stops[0].arrival, Time::from_hhmm("14:00").unwrap());
        assert_eq!(stops[0].departure, Time::from_hhmm("14:30").unwrap());
        // Rest: 06:00 + 660 min driving + 30 min break dwell = 17:30.
        assert_eq!(stops[1].arrival, Time::from_hhmm("17:30").unwrap());
        assert_eq!(stops[1].duration, Duration::from_hours(10));
    }

    #[test]
    fn fuel_stops_every_interval_even_within_one_segment() {
        let rules = HosRules::default();
        let route = Route::new(vec![segment("A", "B", 2500.0, &rules)]);
        let stops = StopPlanner::new(&route, &rules).plan();
        let fuel: Vec<_> = stops
            .iter()
            .filter(|stop| stop.kind == StopKind::Fuel)
            .collect();
        assert_eq!(fuel.len(), 2);
        assert!((fuel[0].position.route_miles.as_miles() - 1000.0).abs() < 1e-6);
        assert!((fuel[1].position.route_miles.as_miles() - 2000.0).abs() < 1e-6);
        // Mid-segment fuel stops are labelled with the segment's endpoint.
        assert_eq!(fuel[0].location.as_ref(), "B");
    }

    #[test]
    fn no_stop_exactly_at_route_end() {
        let rules = HosRules::default();
        // Exactly the fuel interval: the threshold lands on the destination.
        let route = Route::new(vec![segment("A", "B", 1000.0, &rules)]);
        let stops = StopPlanner::new(&route, &rules).plan();
        assert!(stops.iter().all(|stop| stop.kind != StopKind::Fuel));
    }

    #[test]
    fn one_rest_per_excess_day() {
        let rules = HosRules::default();
        // ~33.8 driving hours: three daily limits crossed.
        let route = Route::new(vec![segment("A", "B", 2200.0, &rules)]);
        let rests = StopPlanner::new(&route, &rules)
            .plan()
            .into_iter()
            .filter(|stop| stop.kind == StopKind::LongRest)
            .count();
        assert_eq!(rests, 3);
    }

    #[test]
    fn assumed_position_uses_legacy_fraction() {
        let position = StopPosition::assumed(1, Miles::from_miles(150.0), Miles::from_miles(575.0));
        assert_eq!(position.fraction, 0.75);
        assert!((position.route_miles.as_miles() - (150.0 + 431.25)).abs() < 1e-9);
    }
}
