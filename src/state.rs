use anyhow::{Context, Result};
use eventsched_core::{EventService, EventStore, OverlapScope};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    /// Open the database once at startup; migrations run here, not per request.
    pub fn new(config: &Config) -> Result<Self> {
        let path = config.database.resolved_path();
        let store = EventStore::open(&path, &config.database.store_config())
            .with_context(|| format!("Failed to open event database at {}", path.display()))?;
        Ok(AppState::with_store(store, config.events.overlap_scope))
    }

    pub fn with_store(store: EventStore, scope: OverlapScope) -> Self {
        AppState {
            events: EventService::new(store, scope),
        }
    }
}
