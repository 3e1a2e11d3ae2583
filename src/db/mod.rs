//! Database module for SQLite-backed season statistics

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{PredictorError, PredictorResult};

pub mod player;
pub mod team;
pub mod import_log;
pub mod store;
pub mod stat_service;

pub use import_log::ImportLogEntry;
pub use store::{SqliteStatStore, StatStore};
pub use stat_service::{CombinedData, SetCounts, StatService};

/// Shared SQLite connection; clones refer to the same connection
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database file, creating parent directories as needed
    pub fn new<P: AsRef<Path>>(path: P) -> PredictorResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref()).map_err(|e| {
            PredictorError::DatabaseConnection(format!("{}: {}", path.as_ref().display(), e))
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> PredictorResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PredictorError::DatabaseConnection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run migrations to set up or update the schema
    pub fn run_migrations(&self) -> PredictorResult<()> {
        let conn = self.lock()?;
        let migration_sql = include_str!("migrations/V1__initial_schema.sql");
        conn.execute_batch(migration_sql)
            .map_err(|e| PredictorError::DatabaseMigration(e.to_string()))?;
        Ok(())
    }

    /// Lock the connection for the duration of the returned guard
    pub fn lock(&self) -> PredictorResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PredictorError::DatabaseConnection("connection lock poisoned".to_string()))
    }

    /// Check database health
    pub fn health_check(&self) -> PredictorResult<bool> {
        let conn = self.lock()?;
        let result: i32 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(result == 1)
    }
}
