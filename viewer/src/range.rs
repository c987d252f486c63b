use crate::errors::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Format accepted by the start/end inputs: minute-precision UTC.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Inclusive time window over which readings are requested, in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

/// Default input values: `[now - 30 days, now]`, formatted for the inputs.
pub fn default_inputs(now: DateTime<Utc>) -> (String, String) {
    let start = now - Duration::days(DEFAULT_WINDOW_DAYS);
    (format_input(start), format_input(now))
}

pub fn format_input(t: DateTime<Utc>) -> String {
    t.format(INPUT_FORMAT).to_string()
}

/// Converts the two input strings to a Unix-second range. Malformed input
/// is reported per field; `start <= end` is not enforced, matching the
/// query API which simply returns nothing for an inverted window.
pub fn parse_inputs(start: &str, end: &str) -> Result<TimeRange> {
    Ok(TimeRange {
        start: parse_input(start)?,
        end: parse_input(end)?,
    })
}

fn parse_input(value: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(value, INPUT_FORMAT)
        .map(|t| t.and_utc().timestamp())
        .map_err(|e| Error::InvalidRange(format!("{value:?}: {e}")))
}
