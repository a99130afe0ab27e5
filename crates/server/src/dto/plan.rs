use roadlog::{
    TripPlan, TripRequest,
    compliance::ComplianceResult,
    hos::DutyCycle,
    logbook::DailyLog,
    route::Operation,
    shared::Time,
    stops::{Stop, StopKind},
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct PlanRequestDto {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub cycle: DutyCycle,
    pub available_driving_hours: f64,
}

impl From<PlanRequestDto> for TripRequest {
    fn from(value: PlanRequestDto) -> Self {
        Self {
            current_location: value.current_location.into(),
            pickup_location: value.pickup_location.into(),
            dropoff_location: value.dropoff_location.into(),
            cycle: value.cycle,
            available_driving_hours: value.available_driving_hours,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SegmentDto {
    pub start_location: String,
    pub end_location: String,
    pub miles: f64,
    pub driving_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StopDto {
    pub location: String,
    pub kind: StopKind,
    pub duration: String,
    pub arrival: Time,
    pub departure: Time,
    pub reason: String,
}

impl StopDto {
    fn from(stop: &Stop) -> Self {
        Self {
            location: stop.location.to_string(),
            kind: stop.kind,
            duration: stop.duration_label(),
            arrival: stop.arrival,
            departure: stop.departure,
            reason: stop.reason.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlanResponseDto {
    pub total_miles: f64,
    pub total_driving_minutes: u32,
    pub multi_day: bool,
    pub compliance: ComplianceResult,
    pub segments: Vec<SegmentDto>,
    pub stops: Vec<StopDto>,
    pub daily_miles: Vec<f64>,
    pub logs: Vec<DailyLog>,
}

impl From<TripPlan> for PlanResponseDto {
    fn from(plan: TripPlan) -> Self {
        let segments = plan
            .route
            .segments()
            .iter()
            .map(|segment| SegmentDto {
                start_location: segment.start_location.to_string(),
                end_location: segment.end_location.to_string(),
                miles: segment.distance.as_miles(),
                driving_minutes: segment.driving_time.as_minutes(),
                operation: segment.operation,
            })
            .collect();
        Self {
            total_miles: plan.route.total_distance().as_miles(),
            total_driving_minutes: plan.route.total_driving_time().as_minutes(),
            multi_day: plan.logs.len() > 1,
            compliance: plan.compliance,
            segments,
            stops: plan.stops.iter().map(StopDto::from).collect(),
            daily_miles: plan
                .logs
                .iter()
                .map(|log| log.total_miles.as_miles())
                .collect(),
            logs: plan.logs,
        }
    }
}
