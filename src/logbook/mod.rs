use std::sync::Arc;

use chrono::{Days, NaiveDate};
use thiserror::Error;
use tracing::warn;

mod interval;
pub use interval::*;

use crate::{
    hos::HosRules,
    planner::TripRequest,
    route::{Operation, Route, RouteSegment},
    shared::{MINUTES_PER_DAY, Miles, Time},
    stops::{DEFAULT_TRIP_START, Stop, StopKind},
};

const EPS: f64 = 1e-9;

#[derive(Error, Debug)]
pub enum Error {
    #[error("route has no segments to log")]
    EmptyRoute,
    /// The stop list cannot anchor the number of duty days the trip needs.
    #[error("stop list anchors {found} day(s) but the trip requires {expected}")]
    MissingRestStop { expected: usize, found: usize },
    #[error("rest stops are out of order along the route")]
    UnorderedRestStops,
    #[error("trip activity runs past day {day}")]
    DayOverrun { day: usize },
    #[error("day {day} log does not cover 00:00-24:00 without gaps")]
    NotGapless { day: usize },
}

/// Partitions a trip into one daily log per calendar day it touches, and
/// synthesizes the full 24-hour duty-interval sheet for each day by walking
/// segments and stops in lockstep. Never emits partial logs: any
/// inconsistency is an [`Error`].
pub struct LogSynthesizer<'a> {
    trip: &'a TripRequest,
    route: &'a Route,
    stops: &'a [Stop],
    rules: &'a HosRules,
    start_date: NaiveDate,
    departure: Time,
}

impl<'a> LogSynthesizer<'a> {
    pub fn new(
        trip: &'a TripRequest,
        route: &'a Route,
        stops: &'a [Stop],
        rules: &'a HosRules,
    ) -> Self {
        Self {
            trip,
            route,
            stops,
            rules,
            start_date: chrono::Local::now().date_naive(),
            departure: DEFAULT_TRIP_START,
        }
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn departure_at(mut self, departure: Time) -> Self {
        self.departure = departure;
        self
    }

    pub fn synthesize(&self) -> Result<Vec<DailyLog>, self::Error> {
        let segments = self.route.segments();
        if segments.is_empty() {
            return Err(Error::EmptyRoute);
        }

        self.validate_rests()?;
        let profile = MileageProfile::new(segments);
        let timeline = self.walk_timeline(&profile);
        // The trailing off-duty interval always closes out the last day.
        let day_count = (timeline.mark() / MINUTES_PER_DAY).max(1) as usize;
        let day_miles = self.allocate_miles(&profile, &timeline, day_count);
        let day_intervals = self.split_days(timeline, day_count)?;

        let mut logs = Vec::with_capacity(day_count);
        let mut start_location = self.trip.current_location.clone();
        for (day, intervals) in day_intervals.into_iter().enumerate() {
            validate_day(&intervals).map_err(|_| Error::NotGapless { day: day + 1 })?;
            self.check_on_duty_window(day, &intervals);

            let end_location = intervals
                .last()
                .map(|interval| interval.location.clone())
                .unwrap_or_else(|| self.trip.dropoff_location.clone());
            let date = self
                .start_date
                .checked_add_days(Days::new(day as u64))
                .unwrap_or(self.start_date);
            logs.push(DailyLog {
                date,
                start_location: start_location.clone(),
                end_location: end_location.clone(),
                total_miles: Miles::from_miles(day_miles[day]),
                intervals,
            });
            start_location = end_location;
        }
        Ok(logs)
    }

    /// Checks the long-rest stops are in route order and that there are
    /// enough of them to anchor every duty day the trip's driving time
    /// requires.
    fn validate_rests(&self) -> Result<(), self::Error> {
        let mut rests = 0usize;
        let mut last_miles = f64::NEG_INFINITY;
        for stop in self
            .stops
            .iter()
            .filter(|stop| stop.kind == StopKind::LongRest)
        {
            let miles = stop.position.route_miles.as_miles();
            if miles < last_miles {
                return Err(Error::UnorderedRestStops);
            }
            last_miles = miles;
            rests += 1;
        }

        let total_driving = self.route.total_driving_time().as_minutes();
        let daily = self.rules.max_daily_driving().as_minutes();
        let required_days = (total_driving.div_ceil(daily)).max(1) as usize;
        if rests + 1 < required_days {
            return Err(Error::MissingRestStop {
                expected: required_days,
                found: rests + 1,
            });
        }
        Ok(())
    }

    /// Splits total mileage at each midnight by mapping the driving minutes
    /// accrued by that instant back into route miles. The final day takes
    /// the remainder, so the day totals always sum to the route total.
    fn allocate_miles(
        &self,
        profile: &MileageProfile,
        timeline: &Timeline,
        day_count: usize,
    ) -> Vec<f64> {
        let mut day_miles = Vec::with_capacity(day_count);
        let mut allocated = 0.0;
        for day in 1..day_count {
            let boundary = day as u32 * MINUTES_PER_DAY;
            let driven: u32 = timeline
                .intervals()
                .iter()
                .filter(|interval| interval.status == DutyStatus::Driving)
                .map(|interval| {
                    interval
                        .end
                        .as_minutes()
                        .min(boundary)
                        .saturating_sub(interval.start.as_minutes())
                })
                .sum();
            let miles = profile.miles_at(driven as f64);
            day_miles.push(miles - allocated);
            allocated = miles;
        }
        day_miles.push(profile.total_miles() - allocated);
        day_miles
    }

    /// Walks segments and stops in lockstep on one running clock, emitting
    /// the whole trip as a flat interval timeline in day-zero minutes.
    fn walk_timeline(&self, profile: &MileageProfile) -> Timeline {
        let segments = self.route.segments();

        enum Event<'s> {
            Halt(&'s Stop),
            Service(Operation, Arc<str>),
        }
        let mut events: Vec<(f64, u8, Event)> = Vec::new();
        for stop in self.stops {
            events.push((stop.position.route_miles.as_miles(), 0, Event::Halt(stop)));
        }
        for (index, segment) in segments.iter().enumerate() {
            if let Some(operation) = segment.operation {
                events.push((
                    profile.miles[index + 1],
                    1,
                    Event::Service(operation, segment.end_location.clone()),
                ));
            }
        }
        events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut timeline = Timeline::new();
        let departure = self.departure.as_minutes() as f64;
        let pretrip = self.rules.pretrip().as_minutes() as f64;
        timeline.emit(
            departure - pretrip,
            DutyStatus::OffDuty,
            self.trip.current_location.clone(),
            Some("Off duty"),
        );
        timeline.emit(
            departure,
            DutyStatus::OnDuty,
            self.trip.current_location.clone(),
            Some("Pre-trip inspection"),
        );

        let mut clock = departure;
        let mut driven = 0.0;
        let mut previous: Arc<str> = self.trip.current_location.clone();
        for (miles, _, event) in events {
            let target = profile.minutes_at(miles);
            let location = match &event {
                Event::Halt(stop) => stop.location.clone(),
                Event::Service(_, location) => location.clone(),
            };
            if target - driven > EPS {
                clock += target - driven;
                driven = target;
                timeline.emit(
                    clock,
                    DutyStatus::Driving,
                    format!("{} to {}", previous, location).into(),
                    Some("En route"),
                );
            }
            match event {
                Event::Halt(stop) => {
                    let dwell = (stop.departure - stop.arrival).as_minutes() as f64;
                    clock += dwell;
                    match stop.kind {
                        StopKind::Fuel => timeline.emit(
                            clock,
                            DutyStatus::OnDuty,
                            stop.location.clone(),
                            Some(&stop.reason),
                        ),
                        StopKind::ShortBreak => timeline.emit(
                            clock,
                            DutyStatus::OffDuty,
                            stop.location.clone(),
                            Some(&stop.reason),
                        ),
                        StopKind::LongRest => {
                            timeline.emit(
                                clock,
                                DutyStatus::Sleeper,
                                stop.location.clone(),
                                Some(&stop.reason),
                            );
                            clock += pretrip;
                            timeline.emit(
                                clock,
                                DutyStatus::OnDuty,
                                stop.location.clone(),
                                Some("Pre-trip inspection"),
                            );
                        }
                    }
                }
                Event::Service(operation, location) => {
                    clock += self.rules.pickup_dropoff_service().as_minutes() as f64;
                    let remark = match operation {
                        Operation::Pickup => "Loading at shipper",
                        Operation::Dropoff => "Unloading at receiver",
                    };
                    timeline.emit(clock, DutyStatus::OnDuty, location.clone(), Some(remark));
                }
            }
            previous = location;
        }

        // Any driving left after the last event.
        let total_minutes = profile.total_minutes();
        if total_minutes - driven > EPS {
            clock += total_minutes - driven;
            let destination: Arc<str> = self.route.end_location().unwrap_or_default().into();
            timeline.emit(
                clock,
                DutyStatus::Driving,
                format!("{} to {}", previous, destination).into(),
                Some("En route"),
            );
        }

        // Off duty through the end of the final day.
        let day_end = timeline.mark().div_ceil(MINUTES_PER_DAY) * MINUTES_PER_DAY;
        timeline.emit(
            day_end as f64,
            DutyStatus::OffDuty,
            self.trip.dropoff_location.clone(),
            Some("Off duty"),
        );
        timeline
    }

    /// Cuts the flat timeline at midnights. An interval spanning a midnight
    /// is split into both calendar days; the continuation of a rest period
    /// carries a remark saying so, everything else keeps its own.
    fn split_days(
        &self,
        timeline: Timeline,
        day_count: usize,
    ) -> Result<Vec<Vec<DutyInterval>>, self::Error> {
        let mut days: Vec<Vec<DutyInterval>> = vec![Vec::new(); day_count];
        for interval in timeline.into_intervals() {
            let mut start = interval.start.as_minutes();
            let end = interval.end.as_minutes();
            while start < end {
                let day = (start / MINUTES_PER_DAY) as usize;
                if day >= day_count {
                    return Err(Error::DayOverrun { day: day_count });
                }
                let boundary = (start / MINUTES_PER_DAY + 1) * MINUTES_PER_DAY;
                let piece_end = end.min(boundary);
                let remarks = if start > interval.start.as_minutes()
                    && interval.status == DutyStatus::Sleeper
                {
                    Some(format!(
                        "Continued {}-hour rest period",
                        self.rules.min_off_duty_hours
                    ))
                } else {
                    interval.remarks.clone()
                };
                days[day].push(DutyInterval {
                    start: Time::from_minutes(start - day as u32 * MINUTES_PER_DAY),
                    end: Time::from_minutes(piece_end - day as u32 * MINUTES_PER_DAY),
                    status: interval.status,
                    location: interval.location.clone(),
                    remarks,
                });
                start = piece_end;
            }
        }
        Ok(days)
    }

    fn check_on_duty_window(&self, day: usize, intervals: &[DutyInterval]) {
        let working = |interval: &&DutyInterval| {
            matches!(
                interval.status,
                DutyStatus::Driving | DutyStatus::OnDuty
            )
        };
        let first = intervals.iter().find(working);
        let last = intervals.iter().rev().find(working);
        if let Some(first) = first
            && let Some(last) = last
        {
            let window = last.end - first.start;
            if window > self.rules.max_on_duty_window() {
                warn!(
                    "Day {} on-duty window of {} minutes exceeds the {}-hour limit",
                    day + 1,
                    window.as_minutes(),
                    self.rules.max_on_duty_hours
                );
            }
        }
    }
}

/// Piecewise-linear mapping between route miles and cumulative driving
/// minutes, built from the segment prefix sums. Monotone both ways.
struct MileageProfile {
    miles: Vec<f64>,
    minutes: Vec<f64>,
}

impl MileageProfile {
    fn new(segments: &[RouteSegment]) -> Self {
        let mut miles = Vec::with_capacity(segments.len() + 1);
        let mut minutes = Vec::with_capacity(segments.len() + 1);
        miles.push(0.0);
        minutes.push(0.0);
        for segment in segments {
            miles.push(miles.last().unwrap() + segment.distance.as_miles());
            minutes.push(minutes.last().unwrap() + segment.driving_time.as_minutes() as f64);
        }
        Self { miles, minutes }
    }

    fn total_miles(&self) -> f64 {
        *self.miles.last().unwrap()
    }

    fn total_minutes(&self) -> f64 {
        *self.minutes.last().unwrap()
    }

    fn minutes_at(&self, miles: f64) -> f64 {
        let miles = miles.clamp(0.0, self.total_miles());
        let mut index = 0;
        while index + 2 < self.miles.len() && miles > self.miles[index + 1] + EPS {
            index += 1;
        }
        let span_miles = self.miles[index + 1] - self.miles[index];
        let span_minutes = self.minutes[index + 1] - self.minutes[index];
        self.minutes[index] + (miles - self.miles[index]) / span_miles * span_minutes
    }

    fn miles_at(&self, minutes: f64) -> f64 {
        let minutes = minutes.clamp(0.0, self.total_minutes());
        let mut index = 0;
        while index + 2 < self.minutes.len() && minutes > self.minutes[index + 1] + EPS {
            index += 1;
        }
        let span_minutes = self.minutes[index + 1] - self.minutes[index];
        let span_miles = self.miles[index + 1] - self.miles[index];
        self.miles[index] + (minutes - self.minutes[index]) / span_minutes * span_miles
    }
}

struct AbsInterval {
    start: Time,
    end: Time,
    status: DutyStatus,
    location: Arc<str>,
    remarks: Option<String>,
}

/// Flat trip timeline in day-zero minutes. Emission rounds the running
/// fractional clock to whole minutes and keeps intervals contiguous by
/// always starting where the previous one ended.
struct Timeline {
    intervals: Vec<AbsInterval>,
    mark: u32,
}

impl Timeline {
    fn new() -> Self {
        Self {
            intervals: Vec::new(),
            mark: 0,
        }
    }

    fn mark(&self) -> u32 {
        self.mark
    }

    fn intervals(&self) -> &[AbsInterval] {
        &self.intervals
    }

    fn into_intervals(self) -> Vec<AbsInterval> {
        self.intervals
    }

    fn emit(&mut self, until: f64, status: DutyStatus, location: Arc<str>, remarks: Option<&str>) {
        let end = until.round();
        if end < 0.0 {
            return;
        }
        let end = end as u32;
        if end <= self.mark {
            // Rounded away to nothing; the next interval picks up here.
            return;
        }
        self.intervals.push(AbsInterval {
            start: Time::from_minutes(self.mark),
            end: Time::from_minutes(end),
            status,
            location,
            remarks: remarks.map(str::to_string),
        });
        self.mark = end;
    }
}

/// Checks that a day's intervals are gapless, strictly ordered, and cover
/// exactly 00:00 through 24:00.
fn validate_day(intervals: &[DutyInterval]) -> Result<(), ()> {
    let Some(first) = intervals.first() else {
        return Err(());
    };
    if first.start.as_minutes() != 0 {
        return Err(());
    }
    let mut cursor = 0;
    for interval in intervals {
        if interval.start.as_minutes() != cursor || interval.end <= interval.start {
            return Err(());
        }
        cursor = interval.end.as_minutes();
    }
    if cursor != MINUTES_PER_DAY {
        return Err(());
    }
    Ok(())
}
