pub mod compliance;
pub mod hos;
pub mod logbook;
pub mod planner;
pub mod route;
pub mod shared;
pub mod stops;
pub mod store;

pub use planner::{Planner, TripPlan, TripRequest};

pub mod prelude {
    pub use crate::compliance::ComplianceResult;
    pub use crate::hos::{DutyCycle, HosRules};
    pub use crate::logbook::{DailyLog, DutyInterval, DutyStatus};
    pub use crate::planner::{Planner, RoutePlan, TripPlan, TripRequest};
    pub use crate::route::provider::{DistanceProvider, Leg, StaticDistanceTable};
    pub use crate::route::{Route, RouteSegment, Waypoint};
    pub use crate::shared::{Duration, Miles, Time};
    pub use crate::stops::{Stop, StopKind};
    pub use crate::store::{MemoryStore, TripStore};
}
