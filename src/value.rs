//! Best-effort coercion of wire strings into typed values
//!
//! The API returns every field as a string. [`coerce`] guesses the original
//! type by attempting a fixed chain of parsers in priority order and falls
//! back to the unchanged text when nothing matches, so it never fails.
//! Returned values can still be surprising for free-form text fields; opt
//! in deliberately.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// A field value recovered from its wire string
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    /// Date or timestamp literal; bare dates land at midnight
    Timestamp(NaiveDateTime),
    /// Time of day since midnight, or an hour span exceeding 24 hours
    Duration(TimeDelta),
    /// Fallback: the original string unchanged
    Text(String),
}

/// Wire formats carrying a date component
const TIMESTAMP_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Wire formats for time-of-day literals
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parser chain in priority order: first success wins
const PARSERS: &[fn(&str) -> Option<FieldValue>] = &[
    parse_int,
    parse_float,
    parse_temporal,
    parse_long_duration,
];

/// Coerce a wire string into its guessed original type
pub fn coerce(raw: &str) -> FieldValue {
    PARSERS
        .iter()
        .find_map(|parse| parse(raw))
        .unwrap_or_else(|| FieldValue::Text(raw.to_string()))
}

fn parse_int(raw: &str) -> Option<FieldValue> {
    raw.parse().ok().map(FieldValue::Int)
}

fn parse_float(raw: &str) -> Option<FieldValue> {
    raw.parse().ok().map(FieldValue::Float)
}

/// Generic date/time parse
///
/// Dates and timestamps always carry a `/` separator on the wire, so a
/// literal without one can only be a time, narrowed to a duration since
/// midnight.
fn parse_temporal(raw: &str) -> Option<FieldValue> {
    if raw.contains('/') {
        for format in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(FieldValue::Timestamp(ts));
            }
        }
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
        Some(FieldValue::Timestamp(date.and_time(NaiveTime::MIN)))
    } else {
        let time = TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())?;
        Some(FieldValue::Duration(
            TimeDelta::hours(i64::from(time.hour()))
                + TimeDelta::minutes(i64::from(time.minute()))
                + TimeDelta::seconds(i64::from(time.second())),
        ))
    }
}

/// Durations beyond 24 hours come through as `H:M:S` with an oversized hour
/// field, which no time-of-day parse accepts
fn parse_long_duration(raw: &str) -> Option<FieldValue> {
    let mut parts = raw.split(':');
    let (hours, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    let seconds: i64 = seconds.parse().ok()?;

    Some(FieldValue::Duration(
        TimeDelta::hours(hours) + TimeDelta::minutes(minutes) + TimeDelta::seconds(seconds),
    ))
}
