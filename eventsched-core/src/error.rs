//! Error types for eventsched.

use thiserror::Error;

/// Errors that can occur while listing or creating events.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event overlaps with existing event {existing_id}")]
    Overlap { existing_id: i64 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Migration v{version} failed: {message}")]
    Migration { version: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EventError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EventError::InvalidInput(message.into())
    }

    /// True for errors caused by the request itself rather than the store.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EventError::InvalidInput(_) | EventError::Overlap { .. })
    }
}

/// Result type alias for eventsched operations.
pub type EventResult<T> = Result<T, EventError>;
