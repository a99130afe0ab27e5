pub mod time;
pub mod units;

pub use time::*;
pub use units::*;

/// Formats a duration as a short human-readable label, e.g. "30 min",
/// "10 h" or "1 h 15 min".
pub fn format_duration(duration: Duration) -> String {
    let hours = duration.as_minutes() / 60;
    let minutes = duration.as_minutes() % 60;
    if hours == 0 {
        format!("{} min", minutes)
    } else if minutes == 0 {
        format!("{} h", hours)
    } else {
        format!("{} h {} min", hours, minutes)
    }
}

#[test]
fn format_duration_minutes_only() {
    assert_eq!(format_duration(Duration::from_minutes(30)), "30 min");
}

#[test]
fn format_duration_hours_only() {
    assert_eq!(format_duration(Duration::from_hours(10)), "10 h");
}

#[test]
fn format_duration_mixed() {
    assert_eq!(format_duration(Duration::from_minutes(75)), "1 h 15 min");
}
