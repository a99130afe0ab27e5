use serde::{Deserialize, Serialize};

use crate::{hos::HosRules, planner::TripRequest, route::Route};

/// Verdict of the advisory HOS check. Violations are data, not errors: log
/// generation proceeds regardless so a driver can see what a non-compliant
/// plan would look like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub is_compliant: bool,
    pub violations: Vec<String>,
}

impl ComplianceResult {
    fn from_violations(violations: Vec<String>) -> Self {
        Self {
            is_compliant: violations.is_empty(),
            violations,
        }
    }
}

/// Checks a route against the driver's available hours and duty-cycle limit.
pub fn check(trip: &TripRequest, route: &Route, rules: &HosRules) -> ComplianceResult {
    let mut violations = Vec::new();
    let required_hours = route.total_driving_time().as_hours();

    if required_hours > trip.available_driving_hours {
        violations.push(format!(
            "Trip requires {:.1} hours of driving, but only {:.1} hours available.",
            required_hours, trip.available_driving_hours
        ));
    }

    let cycle_limit = rules.cycle_limit_hours(trip.cycle);
    if required_hours > cycle_limit as f64 {
        violations.push(format!("Trip exceeds {} cycle limit.", trip.cycle));
    }

    ComplianceResult::from_violations(violations)
}
