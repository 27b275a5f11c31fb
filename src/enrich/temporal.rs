//! Decomposition of a publish instant into calendar parts.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// English day names indexed by weekday, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Calendar parts of a single instant.
///
/// Everything here is a pure function of the instant in its embedded UTC offset;
/// no timezone database is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalParts {
    /// `YYYY-MM-DD`
    pub published_date: String,
    /// `HH:mm:ss`
    pub published_time: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    /// 0=Sunday .. 6=Saturday
    pub weekday: u32,
    pub weekday_name: &'static str,
    /// 0-23
    pub hour: u32,
    /// Fixed 4-hour bucket, `"00-03"` .. `"20-23"`.
    pub time_slot: String,
    pub is_weekend: bool,
}

/// Expand a timestamp into its calendar parts.
#[must_use]
pub fn decompose(instant: DateTime<FixedOffset>) -> TemporalParts {
    let weekday = instant.weekday().num_days_from_sunday();
    let hour = instant.hour();
    let slot_start = hour / 4 * 4;

    TemporalParts {
        published_date: instant.format("%Y-%m-%d").to_string(),
        published_time: instant.format("%H:%M:%S").to_string(),
        year: instant.year(),
        month: instant.month(),
        day: instant.day(),
        weekday,
        weekday_name: WEEKDAY_NAMES[weekday as usize],
        hour,
        time_slot: format!("{slot_start:02}-{:02}", slot_start + 3),
        is_weekend: weekday == 0 || weekday == 6,
    }
}
