use std::{
    collections::BTreeMap,
    sync::Mutex,
};

use thiserror::Error;

use crate::planner::{TripPlan, TripRequest};

pub type SavedTripId = u64;

#[derive(Error, Debug)]
pub enum Error {
    #[error("trip {0} not found")]
    NotFound(SavedTripId),
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Persistence collaborator for planned trips. The engine defines no schema
/// beyond [`TripPlan`] itself; backends decide how to keep it.
pub trait TripStore {
    fn save(&self, plan: &TripPlan) -> Result<SavedTripId, self::Error>;
    fn get(&self, id: SavedTripId) -> Result<TripPlan, self::Error>;
    fn list(&self) -> Vec<(SavedTripId, TripRequest)>;
    fn delete(&self, id: SavedTripId) -> Result<(), self::Error>;
}

#[derive(Default)]
struct StoreState {
    next_id: SavedTripId,
    trips: BTreeMap<SavedTripId, TripPlan>,
}

/// In-memory reference store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl TripStore for MemoryStore {
    fn save(&self, plan: &TripPlan) -> Result<SavedTripId, self::Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.next_id += 1;
        let id = state.next_id;
        state.trips.insert(id, plan.clone());
        Ok(id)
    }

    fn get(&self, id: SavedTripId) -> Result<TripPlan, self::Error> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.trips.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    fn list(&self) -> Vec<(SavedTripId, TripRequest)> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .trips
            .iter()
            .map(|(id, plan)| (*id, plan.trip.clone()))
            .collect()
    }

    fn delete(&self, id: SavedTripId) -> Result<(), self::Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.trips.remove(&id).map(|_| ()).ok_or(Error::NotFound(id))
    }
}
