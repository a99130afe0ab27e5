use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::{Miles, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatus {
    Driving,
    OnDuty,
    OffDuty,
    Sleeper,
}

/// One contiguous block of a duty day. Intervals in a day are gapless and
/// together cover 00:00 through 24:00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyInterval {
    pub start: Time,
    pub end: Time,
    pub status: DutyStatus,
    pub location: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl DutyInterval {
    pub fn duration(&self) -> crate::shared::Duration {
        self.end - self.start
    }
}

/// One driver log sheet: a calendar day of duty intervals plus the mileage
/// covered that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub start_location: Arc<str>,
    pub end_location: Arc<str>,
    pub total_miles: Miles,
    pub intervals: Vec<DutyInterval>,
}

impl DailyLog {
    pub fn driving_minutes(&self) -> u32 {
        self.intervals
            .iter()
            .filter(|interval| interval.status == DutyStatus::Driving)
            .map(|interval| interval.duration().as_minutes())
            .sum()
    }
}
