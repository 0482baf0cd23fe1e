//! Timestamp parsing
//!
//! Converts the epoch integers and date strings found in input documents into
//! UTC calendar timestamps. Every failure is a [`TimestampError`]; nothing
//! falls back to the current time.
//!
//! Accepted string forms, tried in order:
//!
//! - eight-digit strings (`"20230101"`), read as basic-format dates
//! - other integer strings (`"1700000000"`), read as epoch seconds
//! - RFC 3339 (`2023-01-01T10:00:00+02:00`)
//! - naive date-times (`2023-01-01T10:00:00`, `2023-01-01 10:00:00.250`), read as UTC
//! - dates (`2023-01-01`), read as midnight UTC

use crate::domain::TimestampError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const BASIC_DATE_FORMAT: &str = "%Y%m%d";

/// A raw timestamp as it appears in an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampInput<'a> {
    /// Seconds since the Unix epoch
    Epoch(i64),
    /// Textual date or date-time
    Text(&'a str),
}

impl From<i64> for TimestampInput<'_> {
    fn from(value: i64) -> Self {
        TimestampInput::Epoch(value)
    }
}

impl<'a> From<&'a str> for TimestampInput<'a> {
    fn from(value: &'a str) -> Self {
        TimestampInput::Text(value)
    }
}

impl<'a> From<&'a String> for TimestampInput<'a> {
    fn from(value: &'a String) -> Self {
        TimestampInput::Text(value.as_str())
    }
}

/// Parse an epoch integer or a date string into a UTC timestamp
///
/// # Examples
///
/// ```
/// use refiner::core::timestamp::parse_timestamp;
///
/// let from_epoch = parse_timestamp(1_700_000_000_i64).unwrap();
/// let from_text = parse_timestamp("2023-11-14T22:13:20Z").unwrap();
/// assert_eq!(from_epoch, from_text);
/// ```
pub fn parse_timestamp<'a>(
    input: impl Into<TimestampInput<'a>>,
) -> Result<DateTime<Utc>, TimestampError> {
    match input.into() {
        TimestampInput::Epoch(seconds) => parse_epoch(seconds),
        TimestampInput::Text(text) => parse_str(text),
    }
}

/// Parse seconds since the Unix epoch
pub fn parse_epoch(seconds: i64) -> Result<DateTime<Utc>, TimestampError> {
    DateTime::from_timestamp(seconds, 0).ok_or(TimestampError::OutOfRange(seconds))
}

/// Parse a textual timestamp
pub fn parse_str(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Unparsable(text.to_string()));
    }

    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return parse_date(trimmed, BASIC_DATE_FORMAT)
            .ok_or_else(|| TimestampError::Unparsable(text.to_string()));
    }

    if is_integer(trimmed) {
        let seconds = trimmed
            .parse::<i64>()
            .map_err(|_| TimestampError::Unparsable(text.to_string()))?;
        return parse_epoch(seconds);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }

    parse_date(trimmed, DATE_FORMAT).ok_or_else(|| TimestampError::Unparsable(text.to_string()))
}

/// Midnight UTC of a date in the given format
fn parse_date(text: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
