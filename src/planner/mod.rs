use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    compliance::{self, ComplianceResult},
    hos::{DutyCycle, HosRules},
    logbook::{DailyLog, LogSynthesizer},
    route::{self, DistanceProvider, Route, Segmenter, Waypoint},
    shared::Time,
    stops::{DEFAULT_TRIP_START, Stop, StopPlanner},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Route(#[from] route::Error),
    #[error(transparent)]
    Logbook(#[from] crate::logbook::Error),
}

/// One planning request: where the driver is, where the load is, where it
/// goes, and how much driving time the duty cycle has left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_location: Arc<str>,
    pub pickup_location: Arc<str>,
    pub dropoff_location: Arc<str>,
    pub cycle: DutyCycle,
    pub available_driving_hours: f64,
}

impl TripRequest {
    pub fn waypoints(&self) -> Vec<Waypoint> {
        vec![
            Waypoint::new(&self.current_location),
            Waypoint::pickup(&self.pickup_location),
            Waypoint::dropoff(&self.dropoff_location),
        ]
    }
}

/// Segmented route plus the advisory compliance verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub route: Route,
    pub compliance: ComplianceResult,
}

/// Everything one planning run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub trip: TripRequest,
    pub route: Route,
    pub compliance: ComplianceResult,
    pub stops: Vec<Stop>,
    pub logs: Vec<DailyLog>,
}

/// The engine facade. Holds no per-request state, so one planner can serve
/// any number of concurrent planning requests; the distance provider is the
/// only shared collaborator.
pub struct Planner<P> {
    provider: P,
    rules: HosRules,
    departure: Time,
    start_date: Option<NaiveDate>,
    attempts: u32,
}

impl<P: DistanceProvider> Planner<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            rules: HosRules::default(),
            departure: DEFAULT_TRIP_START,
            start_date: None,
            attempts: 3,
        }
    }

    pub fn with_rules(mut self, rules: HosRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn departure_at(mut self, departure: Time) -> Self {
        self.departure = departure;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn rules(&self) -> &HosRules {
        &self.rules
    }

    /// Segments the trip's waypoints and runs the advisory compliance check.
    pub fn plan_route(&self, trip: &TripRequest) -> Result<RoutePlan, self::Error> {
        let route = Segmenter::new(&self.provider, &self.rules)
            .attempts(self.attempts)
            .segment(&trip.waypoints())?;
        let compliance = compliance::check(trip, &route, &self.rules);
        debug!(
            "Planned {} over {} segments, compliant: {}",
            route.total_distance(),
            route.segments().len(),
            compliance.is_compliant
        );
        Ok(RoutePlan { route, compliance })
    }

    /// Inserts mandated fuel, break, and rest stops along a route.
    pub fn plan_stops(&self, route: &Route) -> Vec<Stop> {
        StopPlanner::new(route, &self.rules)
            .departure_at(self.departure)
            .plan()
    }

    /// Synthesizes one daily log per duty day, anchored at the long-rest
    /// stops.
    pub fn generate_logs(
        &self,
        trip: &TripRequest,
        route: &Route,
        stops: &[Stop],
    ) -> Result<Vec<DailyLog>, self::Error> {
        let mut synthesizer =
            LogSynthesizer::new(trip, route, stops, &self.rules).departure_at(self.departure);
        if let Some(date) = self.start_date {
            synthesizer = synthesizer.start_date(date);
        }
        Ok(synthesizer.synthesize()?)
    }

    /// Full pipeline: segment, then compliance check and stop planning (the
    /// two are independent and run in parallel), then log synthesis.
    /// Compliance violations never abort; logs are generated either way.
    pub fn plan_trip(&self, trip: &TripRequest) -> Result<TripPlan, self::Error>
    where
        P: Sync,
    {
        let route = Segmenter::new(&self.provider, &self.rules)
            .attempts(self.attempts)
            .segment(&trip.waypoints())?;
        let (compliance, stops) = rayon::join(
            || compliance::check(trip, &route, &self.rules),
            || self.plan_stops(&route),
        );
        let logs = self.generate_logs(trip, &route, &stops)?;
        Ok(TripPlan {
            trip: trip.clone(),
            route,
            compliance,
            stops,
            logs,
        })
    }
}
