use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub mod provider;
pub use provider::{CachedProvider, DistanceProvider, Leg, ProviderError, StaticDistanceTable};

use crate::{
    hos::HosRules,
    shared::{Duration, Miles},
};

#[derive(Error, Debug)]
pub enum Error {
    /// A leg came back with a non-positive distance or duration. Fatal to the
    /// planning request.
    #[error("invalid leg from {from} to {to}: {reason}")]
    InvalidRoute {
        from: String,
        to: String,
        reason: String,
    },
    /// The distance provider failed for good, after bounded retries for
    /// transient failures.
    #[error("route lookup failed after {attempts} attempt(s): {source}")]
    Lookup {
        attempts: u32,
        #[source]
        source: ProviderError,
    },
    #[error("a route needs at least two waypoints")]
    NotEnoughWaypoints,
}

/// Cargo operation carried out at a segment's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Pickup,
    Dropoff,
}

/// A named point on the trip, optionally with a cargo operation happening
/// on arrival there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub location: Arc<str>,
    pub operation: Option<Operation>,
}

impl Waypoint {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.into(),
            operation: None,
        }
    }

    pub fn pickup(location: &str) -> Self {
        Self {
            location: location.into(),
            operation: Some(Operation::Pickup),
        }
    }

    pub fn dropoff(location: &str) -> Self {
        Self {
            location: location.into(),
            operation: Some(Operation::Dropoff),
        }
    }
}

/// One contiguous piece of road between two named locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub start_location: Arc<str>,
    pub end_location: Arc<str>,
    pub distance: Miles,
    pub driving_time: Duration,
    /// Cargo operation at `end_location`, if any.
    pub operation: Option<Operation>,
}

/// Ordered, contiguous segments: each segment starts where the previous one
/// ended.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    segments: Box<[RouteSegment]>,
}

impl Route {
    pub fn new(segments: Vec<RouteSegment>) -> Self {
        Self {
            segments: segments.into(),
        }
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_distance(&self) -> Miles {
        self.segments.iter().map(|segment| segment.distance).sum()
    }

    pub fn total_driving_time(&self) -> Duration {
        self.segments
            .iter()
            .map(|segment| segment.driving_time)
            .sum()
    }

    pub fn start_location(&self) -> Option<&str> {
        self.segments
            .first()
            .map(|segment| segment.start_location.as_ref())
    }

    pub fn end_location(&self) -> Option<&str> {
        self.segments
            .last()
            .map(|segment| segment.end_location.as_ref())
    }
}

/// Turns an ordered waypoint list into a [`Route`] by asking the distance
/// provider for each consecutive pair. Pure apart from the provider calls;
/// transient provider failures are retried a bounded number of times.
pub struct Segmenter<'a, P> {
    provider: &'a P,
    rules: &'a HosRules,
    attempts: u32,
}

impl<'a, P: DistanceProvider> Segmenter<'a, P> {
    pub fn new(provider: &'a P, rules: &'a HosRules) -> Self {
        Self {
            provider,
            rules,
            attempts: 3,
        }
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn segment(&self, waypoints: &[Waypoint]) -> Result<Route, self::Error> {
        if waypoints.len() < 2 {
            return Err(Error::NotEnoughWaypoints);
        }
        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        for pair in waypoints.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let leg = self.fetch(&from.location, &to.location)?;
            if leg.distance.as_miles() <= 0.0 {
                return Err(Error::InvalidRoute {
                    from: from.location.to_string(),
                    to: to.location.to_string(),
                    reason: format!("non-positive distance {}", leg.distance),
                });
            }
            let driving_time = match leg.duration {
                Some(duration) if duration.as_minutes() == 0 => {
                    return Err(Error::InvalidRoute {
                        from: from.location.to_string(),
                        to: to.location.to_string(),
                        reason: "non-positive duration".to_string(),
                    });
                }
                Some(duration) => duration,
                None => self.rules.driving_time_for(leg.distance),
            };
            segments.push(RouteSegment {
                start_location: from.location.clone(),
                end_location: to.location.clone(),
                distance: leg.distance,
                driving_time,
                operation: to.operation,
            });
        }
        Ok(Route::new(segments))
    }

    fn fetch(&self, origin: &str, destination: &str) -> Result<Leg, self::Error> {
        for attempt in 1..=self.attempts {
            match self.provider.leg(origin, destination) {
                Ok(leg) => return Ok(leg),
                Err(source @ ProviderError::NotFound { .. }) => {
                    return Err(Error::Lookup {
                        attempts: attempt,
                        source,
                    });
                }
                Err(ProviderError::Unavailable(reason)) if attempt < self.attempts => {
                    warn!(
                        "Distance lookup {origin} -> {destination} failed \
                         (attempt {attempt}/{}): {reason}",
                        self.attempts
                    );
                }
                Err(source) => {
                    return Err(Error::Lookup {
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
        unreachable!("retry loop always returns")
    }
}
