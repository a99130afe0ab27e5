use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::shared::{Duration, Miles};

/// The rolling multi-day on-duty limit a driver operates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyCycle {
    #[serde(rename = "70-hour/8-day")]
    SeventyHourEightDay,
    #[serde(rename = "60-hour/7-day")]
    SixtyHourSevenDay,
}

impl Display for DutyCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DutyCycle::SeventyHourEightDay => f.write_str("70-hour/8-day"),
            DutyCycle::SixtyHourSevenDay => f.write_str("60-hour/7-day"),
        }
    }
}

/// Hours-of-Service limits plus the operational constants the planner needs
/// alongside them. Kept as one explicit table so a regulation change never
/// touches algorithm code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosRules {
    /// Maximum driving hours in a duty day.
    pub max_driving_hours: u32,
    /// Maximum on-duty window in a duty day.
    pub max_on_duty_hours: u32,
    /// Minimum off-duty period between shifts.
    pub min_off_duty_hours: u32,
    /// Length of the mandated short break.
    pub required_break_minutes: u32,
    /// Driving hours allowed before the short break is due.
    pub max_driving_before_break_hours: u32,
    /// Miles between fuel stops.
    pub fuel_stop_interval_miles: f64,
    /// Assumed average road speed in mph.
    pub average_speed_mph: f64,
    /// Service time for a pickup or dropoff operation.
    pub pickup_dropoff_minutes: u32,
    /// Pre-trip inspection time at the start of each duty day.
    pub pretrip_minutes: u32,
    /// Dwell time at a fuel stop.
    pub fuel_stop_minutes: u32,
    /// Cycle limit for the 70-hour/8-day cycle.
    pub cycle_70_hour_limit: u32,
    /// Cycle limit for the 60-hour/7-day cycle.
    pub cycle_60_hour_limit: u32,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            max_driving_hours: 11,
            max_on_duty_hours: 14,
            min_off_duty_hours: 10,
            required_break_minutes: 30,
            max_driving_before_break_hours: 8,
            fuel_stop_interval_miles: 1000.0,
            average_speed_mph: 65.0,
            pickup_dropoff_minutes: 60,
            pretrip_minutes: 15,
            fuel_stop_minutes: 30,
            cycle_70_hour_limit: 70,
            cycle_60_hour_limit: 60,
        }
    }
}

impl HosRules {
    pub fn cycle_limit_hours(&self, cycle: DutyCycle) -> u32 {
        match cycle {
            DutyCycle::SeventyHourEightDay => self.cycle_70_hour_limit,
            DutyCycle::SixtyHourSevenDay => self.cycle_60_hour_limit,
        }
    }

    /// Driving time derived from distance at the assumed average speed,
    /// rounded to the nearest minute.
    pub fn driving_time_for(&self, distance: Miles) -> Duration {
        let minutes = (distance.as_miles() / self.average_speed_mph * 60.0).round();
        Duration::from_minutes(minutes as u32)
    }

    pub fn max_daily_driving(&self) -> Duration {
        Duration::from_hours(self.max_driving_hours)
    }

    pub fn max_on_duty_window(&self) -> Duration {
        Duration::from_hours(self.max_on_duty_hours)
    }

    pub fn min_off_duty(&self) -> Duration {
        Duration::from_hours(self.min_off_duty_hours)
    }

    pub fn required_break(&self) -> Duration {
        Duration::from_minutes(self.required_break_minutes)
    }

    pub fn driving_before_break(&self) -> Duration {
        Duration::from_hours(self.max_driving_before_break_hours)
    }

    pub fn fuel_stop_interval(&self) -> Miles {
        Miles::from_miles(self.fuel_stop_interval_miles)
    }

    pub fn pickup_dropoff_service(&self) -> Duration {
        Duration::from_minutes(self.pickup_dropoff_minutes)
    }

    pub fn pretrip(&self) -> Duration {
        Duration::from_minutes(self.pretrip_minutes)
    }

    pub fn fuel_stop_dwell(&self) -> Duration {
        Duration::from_minutes(self.fuel_stop_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driving_time_rounds_to_nearest_minute() {
        let rules = HosRules::default();
        // 250 mi at 65 mph = 230.77 min
        assert_eq!(
            rules.driving_time_for(Miles::from_miles(250.0)),
            Duration::from_minutes(231)
        );
        // 475 mi at 65 mph = 438.46 min
        assert_eq!(
            rules.driving_time_for(Miles::from_miles(475.0)),
            Duration::from_minutes(438)
        );
    }

    #[test]
    fn cycle_limits() {
        let rules = HosRules::default();
        assert_eq!(rules.cycle_limit_hours(DutyCycle::SeventyHourEightDay), 70);
        assert_eq!(rules.cycle_limit_hours(DutyCycle::SixtyHourSevenDay), 60);
    }

    #[test]
    fn cycle_wire_names() {
        let json = serde_json::to_string(&DutyCycle::SeventyHourEightDay).unwrap();
        assert_eq!(json, "\"70-hour/8-day\"");
        let cycle: DutyCycle = serde_json::from_str("\"60-hour/7-day\"").unwrap();
        assert_eq!(cycle, DutyCycle::SixtyHourSevenDay);
    }
}
