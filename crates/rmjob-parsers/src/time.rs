//! Time parsing and formatting for resource manager attributes.

use crate::ParseError;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// Parse a colon-separated duration (most significant field first) into
/// seconds.
///
/// Every field is folded as `total * 60 + field`, so `"73:29:59"`,
/// `"29:59"` and `"59"` are all accepted. Hours are unbounded.
pub fn parse_duration_secs(s: &str) -> Result<u64, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Duration(s.to_string()));
    }

    s.split(':').try_fold(0u64, |total, field| {
        let value: u64 = field
            .parse()
            .map_err(|_| ParseError::Duration(s.to_string()))?;
        total
            .checked_mul(60)
            .and_then(|t| t.checked_add(value))
            .ok_or_else(|| ParseError::Duration(s.to_string()))
    })
}

/// Format seconds as `HH:MM:SS`, hours unbounded (e.g. `"26:15:34"`).
pub fn format_walltime(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// Format a timestamp as `CCYYMMDDhhmm.SS` in the given time zone.
pub fn format_execution_time<Tz>(time: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(tz).format("%C%y%m%d%H%M.%S").to_string()
}

/// Format a timestamp as `CCYYMMDDhhmm.SS` in the local time zone.
pub fn format_execution_time_local(time: &DateTime<Utc>) -> String {
    format_execution_time(time, &Local)
}

/// Parse a batch server timestamp.
///
/// Accepts epoch seconds (`"1478625456"`) as reported by the batch library,
/// or the local-time form printed by `qstat -f` (`"Tue Nov  8 12:17:36 2016"`).
pub fn parse_batch_timestamp(s: &str) -> Result<DateTime<Utc>, ParseError> {
    let s = s.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        let secs: i64 = s
            .parse()
            .map_err(|_| ParseError::Timestamp(s.to_string()))?;
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| ParseError::Timestamp(s.to_string()));
    }

    // qstat pads single-digit days with an extra space
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let naive = NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y")
        .map_err(|_| ParseError::Timestamp(s.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ParseError::Timestamp(s.to_string()))
}
