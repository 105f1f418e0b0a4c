//! Time span of a single event occurrence.

use chrono::{DateTime, FixedOffset};

use crate::error::{EventError, EventResult};

/// Half-open interval `[start, end)` between two instants.
///
/// Comparisons are by instant, so spans written with different UTC offsets
/// compare correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeSpan {
    /// Build a span, requiring `start < end`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> EventResult<Self> {
        if start >= end {
            return Err(EventError::invalid("start must be before end"));
        }
        Ok(TimeSpan { start, end })
    }

    /// Strict overlap: `self.start < other.end && self.end > other.start`.
    /// Spans that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Start as microseconds since the Unix epoch.
    pub fn start_micros(&self) -> i64 {
        self.start.timestamp_micros()
    }

    /// End as microseconds since the Unix epoch.
    pub fn end_micros(&self) -> i64 {
        self.end.timestamp_micros()
    }
}
