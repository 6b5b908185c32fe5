use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{Error, Result};

/// Normalizes a free-form date-parseable string to a date-only value.
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and full RFC 3339 strings.
/// The calendar date is taken as written, never shifted through the
/// server's local timezone.
pub fn normalize_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    Err(Error::BadRequest(format!("Invalid date: {}", input)))
}

/// Parses an `HH:MM` time-of-day string.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| Error::BadRequest(format!("Invalid time: {}", input)))
}

/// Combines a date and an `HH:MM` time into a single timestamp.
pub fn combine(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(time), Utc)
}

/// Serializes a date the way the API speaks it: `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
