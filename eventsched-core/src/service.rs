//! List and create operations over the event store.

use tracing::{debug, info, instrument};

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventInput, NewEvent, OverlapScope};
use crate::store::{EventRepo, EventStore};

/// Entry point for callers; wraps an injected store handle.
///
/// Each operation checks one connection out of the pool and returns it when
/// the operation ends, on success and on error alike.
#[derive(Clone)]
pub struct EventService {
    store: EventStore,
    scope: OverlapScope,
}

impl EventService {
    pub fn new(store: EventStore, scope: OverlapScope) -> Self {
        EventService { store, scope }
    }

    /// Every stored event.
    pub fn list(&self) -> EventResult<Vec<Event>> {
        let conn = self.store.conn()?;
        EventRepo::list(&conn)
    }

    /// Validate and store a new event.
    ///
    /// One-time events are rejected with `Overlap` when they intersect a
    /// stored event (within the configured scope). Recurring events are
    /// stored without any overlap check.
    ///
    /// The overlap read and the insert are not isolated from each other:
    /// two concurrent creates can both pass the check.
    #[instrument(skip(self, input))]
    pub fn create(&self, input: EventInput) -> EventResult<Event> {
        let new_event = NewEvent::parse(input)?;
        let conn = self.store.conn()?;

        if new_event.is_recurring {
            debug!(name = %new_event.name, "recurring event, overlap check skipped");
        } else if let Some(existing_id) =
            EventRepo::find_overlap(&conn, &new_event.span, self.scope)?
        {
            info!(name = %new_event.name, existing_id, "event rejected: overlap");
            return Err(EventError::Overlap { existing_id });
        }

        let event = EventRepo::insert(&conn, &new_event)?;
        info!(event_id = event.id, name = %event.name, "event created");
        Ok(event)
    }
}
