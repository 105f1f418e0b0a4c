//! Timestamp parsing and formatting.
//!
//! Clients send ISO-8601 strings. A trailing `Z` is normalized to `+00:00`
//! before parsing. Naive date-times (no offset) are taken as UTC, which is
//! what browser clients produce when they strip the zone suffix.
//!
//! Parsed values are truncated to whole microseconds, the precision the
//! store compares spans at.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound};

use crate::error::{EventError, EventResult};

/// Offset-bearing formats tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

/// Formats without an offset; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a client timestamp, truncated to microseconds.
pub fn parse_timestamp(input: &str) -> EventResult<DateTime<FixedOffset>> {
    parse_exact(input).map(|dt| dt.trunc_subsecs(6))
}

fn parse_exact(input: &str) -> EventResult<DateTime<FixedOffset>> {
    let normalized = normalize(input);
    let s = normalized.as_str();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err(EventError::invalid(format!("unparsable timestamp '{}'", input.trim())))
}

/// Format a timestamp as RFC 3339, keeping its offset (`Z` for UTC).
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Trim, turn a `Z` suffix into `+00:00`, and accept a space between date and time.
fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    let mut s = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => trimmed.to_string(),
    };

    if s.len() > 10 && s.as_bytes()[10] == b' ' {
        s.replace_range(10..11, "T");
    }

    s
}
