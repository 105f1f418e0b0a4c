//! Core of the eventsched API.
//!
//! - `event`: event types and input validation
//! - `time` / `span`: timestamp parsing and the overlap test
//! - `store`: SQLite persistence behind an r2d2 pool
//! - `service`: the list and create operations

pub mod error;
pub mod event;
pub mod service;
pub mod span;
pub mod store;
pub mod time;

pub use error::{EventError, EventResult};
pub use event::{Event, EventInput, NewEvent, OverlapScope};
pub use service::EventService;
pub use span::TimeSpan;
pub use store::{EventStore, StoreConfig};
