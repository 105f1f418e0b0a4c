//! Event types.
//!
//! An `Event` is a stored row. `EventInput` is what a client submitted,
//! still unvalidated; `NewEvent` is an input that passed validation and is
//! ready to be inserted.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{EventError, EventResult};
use crate::span::TimeSpan;
use crate::time::{format_timestamp, parse_timestamp};

/// Separator used when weekday tokens are stored as one text column.
pub const DAYS_DELIMITER: &str = ",";

/// A stored calendar event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub end_time: DateTime<FixedOffset>,
    pub is_recurring: bool,
    /// Weekday tokens, only meaningful when `is_recurring` is set
    pub days_of_week: Vec<String>,
}

/// Raw create request, as decoded from the client.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub is_recurring: bool,
    pub recurring_days: Vec<String>,
}

/// A validated event that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub span: TimeSpan,
    pub is_recurring: bool,
    pub days_of_week: Vec<String>,
}

impl NewEvent {
    /// Validate a client input.
    ///
    /// Fails with `InvalidInput` when the name is missing or blank, when
    /// either timestamp is missing or unparsable, when start is not before
    /// end, or when a weekday token is empty or contains the delimiter.
    pub fn parse(input: EventInput) -> EventResult<Self> {
        let name = input
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| EventError::invalid("name is required"))?;

        let start = required_timestamp(input.start.as_deref(), "start")?;
        let end = required_timestamp(input.end.as_deref(), "end")?;
        let span = TimeSpan::new(start, end)?;

        for day in &input.recurring_days {
            if day.trim().is_empty() || day.contains(DAYS_DELIMITER) {
                return Err(EventError::invalid(format!("invalid weekday token '{}'", day)));
            }
        }

        Ok(NewEvent {
            name,
            span,
            is_recurring: input.is_recurring,
            days_of_week: input.recurring_days,
        })
    }
}

/// Which existing events the one-time overlap check looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapScope {
    /// Every stored event, recurring or not
    #[default]
    All,
    /// Only stored events that are not recurring
    OneTimeOnly,
}

/// Join weekday tokens into their stored form.
pub fn join_days(days: &[String]) -> String {
    days.join(DAYS_DELIMITER)
}

/// Split the stored form back into weekday tokens. Empty text means no days.
pub fn split_days(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(DAYS_DELIMITER).map(str::to_string).collect()
}

fn required_timestamp(value: Option<&str>, field: &str) -> EventResult<DateTime<FixedOffset>> {
    let value = value.ok_or_else(|| EventError::invalid(format!("{} is required", field)))?;
    parse_timestamp(value)
}

fn serialize_timestamp<S>(dt: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(dt))
}
