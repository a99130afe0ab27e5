use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use chrono::{Local, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A point on the trip clock, counted in minutes since midnight of day zero.
/// Values past 24:00 roll into the following day, so a running clock can be
/// carried across a multi-day trip without resetting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Time {
    pub fn wall_clock() -> Self {
        let now = Local::now();
        Self(now.num_seconds_from_midnight() / 60)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    /// Zero-based day this clock value falls on.
    pub const fn day(&self) -> u32 {
        self.0 / MINUTES_PER_DAY
    }

    /// Minutes past midnight of the day this clock value falls on.
    pub const fn time_of_day(&self) -> u32 {
        self.0 % MINUTES_PER_DAY
    }

    pub fn to_hhmm_string(&self) -> String {
        let h = self.0 / 60;
        let m = self.0 % 60;
        format!("{:02}:{:02}", h, m)
    }

    pub fn from_hhmm(time: &str) -> Option<Self> {
        let mut split = time.split(':');
        let hours: u32 = split.next()?.parse().ok()?;
        let minutes: u32 = split.next()?.parse().ok()?;
        if split.next().is_some() || minutes >= 60 {
            return None;
        }
        Some(Self(hours * 60 + minutes))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hhmm_string())
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hhmm_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_hhmm(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {value}")))
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00";
    let stime = Time::from_hhmm(time).unwrap();
    assert_eq!(time, stime.to_hhmm_string())
}

#[test]
fn parse_unparse_2() {
    let time = "06:00";
    let stime = Time::from_hhmm(time).unwrap();
    assert_eq!(time, stime.to_hhmm_string())
}

#[test]
fn parse_unparse_3() {
    let time = "12:30";
    let stime = Time::from_hhmm(time).unwrap();
    assert_eq!(time, stime.to_hhmm_string())
}

#[test]
fn parse_unparse_4() {
    let time = "24:00";
    let stime = Time::from_hhmm(time).unwrap();
    assert_eq!(time, stime.to_hhmm_string())
}

#[test]
fn valid_time_test_1() {
    let time = "00:00";
    assert_eq!(Time::from_hhmm(time).unwrap().as_minutes(), 0);
}

#[test]
fn valid_time_test_2() {
    let time = "00:30";
    assert_eq!(Time::from_hhmm(time).unwrap().as_minutes(), 30);
}

#[test]
fn valid_time_test_3() {
    let time = "01:30";
    assert_eq!(Time::from_hhmm(time).unwrap().as_minutes(), 90);
}

#[test]
fn invalid_time_test_1() {
    let time = "00:0a";
    assert!(Time::from_hhmm(time).is_none())
}

#[test]
fn invalid_time_test_2() {
    let time = "00:00:00";
    assert!(Time::from_hhmm(time).is_none())
}

#[test]
fn invalid_time_test_3() {
    let time = "06:75";
    assert!(Time::from_hhmm(time).is_none())
}

#[test]
fn day_rollover_test() {
    let time = Time::from_minutes(MINUTES_PER_DAY + 345);
    assert_eq!(time.day(), 1);
    assert_eq!(time.time_of_day(), 345);
}

/// A span of time in whole minutes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * 60)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    pub const fn as_hours(&self) -> f64 {
        self.0 as f64 / 60.0
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(0), |acc, value| acc + value)
    }
}
