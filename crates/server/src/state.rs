use roadlog::{Planner, route::DistanceProvider, store::MemoryStore};

pub struct AppState {
    pub planner: Planner<Box<dyn DistanceProvider + Send + Sync>>,
    pub store: MemoryStore,
}

impl AppState {
    pub fn new(planner: Planner<Box<dyn DistanceProvider + Send + Sync>>) -> Self {
        Self {
            planner,
            store: MemoryStore::new(),
        }
    }
}
