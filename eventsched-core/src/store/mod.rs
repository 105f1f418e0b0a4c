//! SQLite-backed event storage.
//!
//! - **[`EventStore`]**: pooled connection handle, opened once at startup
//!   (which also runs the migrations).
//! - **[`migrations`]**: version-tracked schema setup.
//! - **[`EventRepo`]**: stateless queries; every method takes `&Connection`.

mod events;
pub mod migrations;

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::info;

use crate::error::EventResult;

pub use events::EventRepo;

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// A connection checked out of the pool; returned to it on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool settings for the event database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub pool_size: u32,
    pub busy_timeout_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Pragmas applied to every new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {};\
             PRAGMA journal_mode = WAL;\
             PRAGMA foreign_keys = ON;\
             PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))
    }
}

/// Handle to the event database. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct EventStore {
    pool: ConnectionPool,
}

impl EventStore {
    /// Open (or create) a file-backed store and bring its schema up to date.
    pub fn open(path: &Path, config: &StoreConfig) -> EventResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(PragmaCustomizer {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(SqliteConnectionManager::file(path))?;

        let store = EventStore { pool };
        store.migrate()?;

        info!(path = %path.display(), "event store opened");
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    ///
    /// Every SQLite in-memory connection is its own database, so the pool
    /// holds exactly one connection and never recycles it.
    pub fn in_memory() -> EventResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(PragmaCustomizer {
                busy_timeout_ms: StoreConfig::default().busy_timeout_ms,
            }))
            .build(SqliteConnectionManager::memory())?;

        let store = EventStore { pool };
        store.migrate()?;
        Ok(store)
    }

    /// Check a connection out of the pool.
    pub fn conn(&self) -> EventResult<PooledConnection> {
        Ok(self.pool.get()?)
    }

    fn migrate(&self) -> EventResult<()> {
        let conn = self.conn()?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }
}
