//! Queries against the `events` table.

use chrono::{DateTime, FixedOffset};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::instrument;

use crate::error::EventResult;
use crate::event::{Event, NewEvent, OverlapScope, join_days, split_days};
use crate::span::TimeSpan;
use crate::time::format_timestamp;

const SELECT_EVENT: &str =
    "SELECT id, name, start_time, end_time, is_recurring, days_of_week FROM events";

/// Event repository. Stateless; callers pass a connection.
pub struct EventRepo;

impl EventRepo {
    /// All stored events, in insertion order.
    #[instrument(skip(conn))]
    pub fn list(conn: &Connection) -> EventResult<Vec<Event>> {
        let mut stmt = conn.prepare(&format!("{SELECT_EVENT} ORDER BY id"))?;
        let events = stmt
            .query_map([], event_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Id of the first stored event whose span overlaps `span`, if any.
    pub fn find_overlap(
        conn: &Connection,
        span: &TimeSpan,
        scope: OverlapScope,
    ) -> EventResult<Option<i64>> {
        let sql = match scope {
            OverlapScope::All => {
                "SELECT id FROM events WHERE start_at_us < ?1 AND end_at_us > ?2 \
                 ORDER BY id LIMIT 1"
            }
            OverlapScope::OneTimeOnly => {
                "SELECT id FROM events WHERE start_at_us < ?1 AND end_at_us > ?2 \
                 AND is_recurring = 0 ORDER BY id LIMIT 1"
            }
        };

        let id = conn
            .query_row(sql, params![span.end_micros(), span.start_micros()], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    /// Insert a validated event and return it with its assigned id.
    #[instrument(skip(conn, event), fields(name = %event.name))]
    pub fn insert(conn: &Connection, event: &NewEvent) -> EventResult<Event> {
        conn.execute(
            "INSERT INTO events (name, start_time, end_time, start_at_us, end_at_us, is_recurring, days_of_week)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.name,
                format_timestamp(&event.span.start),
                format_timestamp(&event.span.end),
                event.span.start_micros(),
                event.span.end_micros(),
                event.is_recurring,
                join_days(&event.days_of_week),
            ],
        )?;

        Ok(Event {
            id: conn.last_insert_rowid(),
            name: event.name.clone(),
            start_time: event.span.start,
            end_time: event.span.end,
            is_recurring: event.is_recurring,
            days_of_week: event.days_of_week.clone(),
        })
    }
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let days: String = row.get(5)?;
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        start_time: timestamp_column(row, 2)?,
        end_time: timestamp_column(row, 3)?,
        is_recurring: row.get(4)?,
        days_of_week: split_days(&days),
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<FixedOffset>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
