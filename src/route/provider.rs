use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::{Arc, Mutex},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::shared::{Duration, Miles};

#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider has no route between the two locations. Permanent, never
    /// retried.
    #[error("no route between {from} and {to}")]
    NotFound { from: String, to: String },
    /// The provider failed transiently (network, rate limit). Retried a
    /// bounded number of times by the segmenter.
    #[error("distance provider unavailable: {0}")]
    Unavailable(String),
}

/// One leg of road between two named locations. Providers that cannot supply
/// a measured duration leave it out and the segmenter derives one from the
/// average-speed rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance: Miles,
    pub duration: Option<Duration>,
}

/// The narrow capability the engine needs from a routing service: an
/// address pair in, a distance (and optionally a duration) out.
pub trait DistanceProvider {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError>;
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for &P {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
        (**self).leg(origin, destination)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
        (**self).leg(origin, destination)
    }
}

#[derive(Debug, Deserialize)]
struct TableRow {
    origin: String,
    destination: String,
    miles: f64,
    minutes: Option<u32>,
}

/// Deterministic in-memory distance table. The demonstration and test
/// provider; lookups are symmetric so each pair only needs one row.
#[derive(Debug, Clone, Default)]
pub struct StaticDistanceTable {
    legs: HashMap<(Arc<str>, Arc<str>), Leg>,
}

impl StaticDistanceTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_leg(mut self, origin: &str, destination: &str, leg: Leg) -> Self {
        self.insert(origin, destination, leg);
        self
    }

    pub fn insert(&mut self, origin: &str, destination: &str, leg: Leg) {
        self.legs.insert((origin.into(), destination.into()), leg);
    }

    /// Loads rows of `origin,destination,miles[,minutes]` from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut table = Self::new();
        for row in reader.deserialize() {
            let row: TableRow = row?;
            table.insert(
                &row.origin,
                &row.destination,
                Leg {
                    distance: Miles::from_miles(row.miles),
                    duration: row.minutes.map(Duration::from_minutes),
                },
            );
        }
        debug!("Loaded {} legs from distance table", table.legs.len());
        Ok(table)
    }

    fn lookup(&self, origin: &str, destination: &str) -> Option<Leg> {
        self.legs
            .get(&(origin.into(), destination.into()))
            .or_else(|| self.legs.get(&(destination.into(), origin.into())))
            .copied()
    }
}

impl DistanceProvider for StaticDistanceTable {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
        self.lookup(origin, destination)
            .ok_or_else(|| ProviderError::NotFound {
                from: origin.to_string(),
                to: destination.to_string(),
            })
    }
}

/// Decides when the distance cache must shed entries.
pub trait EvictionPolicy {
    fn over_capacity(&self, len: usize) -> bool;
}

/// Never evicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl EvictionPolicy for Unbounded {
    fn over_capacity(&self, _len: usize) -> bool {
        false
    }
}

/// Holds at most `n` entries, shedding the oldest first.
#[derive(Debug, Clone, Copy)]
pub struct Capped(pub usize);

impl EvictionPolicy for Capped {
    fn over_capacity(&self, len: usize) -> bool {
        len > self.0
    }
}

#[derive(Default)]
struct CacheState {
    legs: HashMap<(Arc<str>, Arc<str>), Leg>,
    order: VecDeque<(Arc<str>, Arc<str>)>,
}

/// Explicit memoization layer over any provider. Lookups that hit skip the
/// inner provider entirely; insertion order is tracked so the eviction
/// policy can shed the oldest entries.
pub struct CachedProvider<P, E = Unbounded> {
    inner: P,
    policy: E,
    state: Mutex<CacheState>,
}

impl<P: DistanceProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            policy: Unbounded,
            state: Mutex::new(CacheState::default()),
        }
    }
}

impl<P: DistanceProvider, E: EvictionPolicy> CachedProvider<P, E> {
    pub fn with_policy(inner: P, policy: E) -> Self {
        Self {
            inner,
            policy,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: DistanceProvider, E: EvictionPolicy> DistanceProvider for CachedProvider<P, E> {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
        let key: (Arc<str>, Arc<str>) = (origin.into(), destination.into());
        {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(leg) = state.legs.get(&key) {
                debug!("Cache hit for {origin} -> {destination}");
                return Ok(*leg);
            }
        }

        let leg = self.inner.leg(origin, destination)?;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.legs.insert(key.clone(), leg).is_none() {
            state.order.push_back(key);
        }
        while self.policy.over_capacity(state.legs.len()) {
            if let Some(oldest) = state.order.pop_front() {
                state.legs.remove(&oldest);
            } else {
                break;
            }
        }
        Ok(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn leg(miles: f64) -> Leg {
        Leg {
            distance: Miles::from_miles(miles),
            duration: None,
        }
    }

    struct Counting<'a>(&'a AtomicUsize, StaticDistanceTable);

    impl DistanceProvider for Counting<'_> {
        fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            self.1.leg(origin, destination)
        }
    }

    #[test]
    fn symmetric_lookup() {
        let table = StaticDistanceTable::new().with_leg("A", "B", leg(100.0));
        assert_eq!(table.leg("A", "B").unwrap(), leg(100.0));
        assert_eq!(table.leg("B", "A").unwrap(), leg(100.0));
        assert!(table.leg("A", "C").is_err());
    }

    #[test]
    fn cache_skips_inner_provider_on_hit() {
        let calls = AtomicUsize::new(0);
        let table = StaticDistanceTable::new().with_leg("A", "B", leg(100.0));
        let cached = CachedProvider::new(Counting(&calls, table));
        cached.leg("A", "B").unwrap();
        cached.leg("A", "B").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capped_policy_sheds_oldest() {
        let calls = AtomicUsize::new(0);
        let table = StaticDistanceTable::new()
            .with_leg("A", "B", leg(1.0))
            .with_leg("B", "C", leg(2.0))
            .with_leg("C", "D", leg(3.0));
        let cached = CachedProvider::with_policy(Counting(&calls, table), Capped(2));
        cached.leg("A", "B").unwrap();
        cached.leg("B", "C").unwrap();
        cached.leg("C", "D").unwrap();
        assert_eq!(cached.len(), 2);
        // Oldest entry was shed, so this goes back to the inner provider.
        cached.leg("A", "B").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
