use roadlog::{TripRequest, store::SavedTripId};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct SavedTripDto {
    pub id: SavedTripId,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
}

impl SavedTripDto {
    pub fn new(id: SavedTripId, trip: TripRequest) -> Self {
        Self {
            id,
            current_location: trip.current_location.to_string(),
            pickup_location: trip.pickup_location.to_string(),
            dropoff_location: trip.dropoff_location.to_string(),
        }
    }
}
