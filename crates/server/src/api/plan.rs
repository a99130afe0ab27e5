use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roadlog::{TripRequest, planner};
use tracing::warn;

use crate::{
    dto::{PlanRequestDto, PlanResponseDto},
    state::AppState,
};

pub async fn plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequestDto>,
) -> Result<Response, StatusCode> {
    let trip: TripRequest = request.into();
    let plan = run_planner(state, trip).await?;
    Ok(Json(PlanResponseDto::from(plan)).into_response())
}

/// The engine is synchronous; run it off the async executor.
pub(crate) async fn run_planner(
    state: Arc<AppState>,
    trip: TripRequest,
) -> Result<roadlog::TripPlan, StatusCode> {
    let result = tokio::task::spawn_blocking(move || state.planner.plan_trip(&trip))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    result.map_err(|err| {
        warn!("Planning failed: {err}");
        match err {
            planner::Error::Route(_) => StatusCode::BAD_REQUEST,
            planner::Error::Logbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    })
}
