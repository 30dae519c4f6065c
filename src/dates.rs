//! Calendar-day normalization and the date arithmetic shared by every
//! aggregation.
//!
//! All day stepping goes through [`NaiveDate`], so a "day" is always one local
//! calendar day and never a fixed 24 hours.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};

use crate::errors::AnalyticsError;
use crate::models::RawTimestamp;

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Mon-first short weekday names, indexed by [`weekday_index`].
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Offset instants whose offset lacks the RFC 3339 colon (`+0000`).
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Maps a raw completion timestamp onto the calendar day it falls on in `zone`.
///
/// * `YYYY-MM-DD` is already a day key and is returned unchanged.
/// * RFC 3339 instants (`2025-11-30T08:30:00.000Z`, also `+0000`) are shifted
///   into `zone`.
/// * Date-times without an offset are read as wall-clock time in `zone`.
/// * Integers are epoch milliseconds.
pub fn normalize<Tz: TimeZone>(
    raw: &RawTimestamp,
    zone: &Tz,
) -> Result<NaiveDate, AnalyticsError> {
    match raw {
        RawTimestamp::Text(text) => normalize_str(text, zone),
        RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis)
            .map(|instant| instant.with_timezone(zone).date_naive())
            .ok_or_else(|| {
                AnalyticsError::parse(millis.to_string(), "epoch milliseconds out of range")
            }),
        RawTimestamp::Other(value) => {
            Err(AnalyticsError::parse(value.to_string(), "not a timestamp"))
        }
    }
}

pub fn normalize_str<Tz: TimeZone>(text: &str, zone: &Tz) -> Result<NaiveDate, AnalyticsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalyticsError::parse(text, "empty value"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT) {
        return Ok(date);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, COMPACT_OFFSET_FORMAT))
    {
        return Ok(instant.with_timezone(zone).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|local| local.date())
        .ok_or_else(|| AnalyticsError::parse(text, "unrecognized date format"))
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday on or before `date`.
pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// 0 for Monday through 6 for Sunday.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// First day of the `days`-long window that ends on `end` (inclusive).
pub fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end - Duration::days(i64::from(days.saturating_sub(1)))
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(AnalyticsError::InvalidMonth { year, month })
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// `"November 2025"`
pub fn month_label(first: NaiveDate) -> String {
    first.format("%B %Y").to_string()
}
