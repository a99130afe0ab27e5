use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roadlog::{TripRequest, store::TripStore};

use crate::{
    api::plan::run_planner,
    dto::{PlanRequestDto, PlanResponseDto, SavedTripDto},
    state::AppState,
};

pub async fn save_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequestDto>,
) -> Result<Response, StatusCode> {
    let trip: TripRequest = request.into();
    let plan = run_planner(state.clone(), trip).await?;
    let id = state
        .store
        .save(&plan)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(SavedTripDto::new(id, plan.trip)).into_response())
}

pub async fn list_trips(State(state): State<Arc<AppState>>) -> Response {
    let trips: Vec<_> = state
        .store
        .list()
        .into_iter()
        .map(|(id, trip)| SavedTripDto::new(id, trip))
        .collect();
    Json(trips).into_response()
}

pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Response, StatusCode> {
    let plan = state.store.get(id).map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(PlanResponseDto::from(plan)).into_response())
}

pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    state.store.delete(id).map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(StatusCode::NO_CONTENT)
}
