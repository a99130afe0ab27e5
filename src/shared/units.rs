use std::{
    cmp,
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Sub},
};

use serde::{Deserialize, Serialize};

/// Road distance in statute miles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Miles(f64);

impl PartialEq for Miles {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Miles {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Miles {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Miles {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sub for Miles {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Miles {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Miles {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Miles {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(0.0), |acc, value| acc + value)
    }
}

impl From<f64> for Miles {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Display for Miles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:.1} mi", self.0))
    }
}

impl Miles {
    pub const fn from_miles(miles: f64) -> Self {
        Self(miles)
    }

    pub const fn as_miles(&self) -> f64 {
        self.0
    }
}

#[test]
fn miles_eq_test() {
    let dist_a = Miles::from_miles(250.0);
    let dist_b = Miles::from_miles(125.0) + Miles::from_miles(125.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn miles_cmp_test() {
    let dist_a = Miles::from_miles(1000.0);
    let dist_b = Miles::from_miles(999.5);
    assert!(dist_a > dist_b)
}

#[test]
fn miles_sum_test() {
    let total: Miles = [250.0, 475.0].into_iter().map(Miles::from_miles).sum();
    assert_eq!(total, Miles::from_miles(725.0))
}
