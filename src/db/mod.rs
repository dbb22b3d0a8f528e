//! SQLite database module for progress persistence
//!
//! Stores per-user, per-chapter progress rows. The catalog itself is never
//! persisted here; it is injected configuration (see `catalog`).
//!
//! ## Tables
//!
//! - `user_study_progress` - one row per (user, study, chapter), upserted on
//!   every page-read or completion, never deleted

pub mod progress;
pub mod schema;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::ProgressError;

/// SQLite database for progress rows
pub struct ProgressDb {
    conn: Mutex<Connection>,
}

impl ProgressDb {
    /// Open or create the progress database
    pub fn open(storage_dir: &Path) -> Result<Self, ProgressError> {
        let db_path = storage_dir.join("progress.db");
        info!("Opening SQLite database at {:?}", db_path);

        let conn = Connection::open(&db_path)
            .map_err(|e| ProgressError::StoreUnavailable(format!("Failed to open SQLite: {}", e)))?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| ProgressError::StoreUnavailable(format!("Failed to set PRAGMA: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, ProgressError> {
        debug!("Opening in-memory SQLite database");

        let conn = Connection::open_in_memory().map_err(|e| {
            ProgressError::StoreUnavailable(format!("Failed to open in-memory SQLite: {}", e))
        })?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<(), ProgressError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ProgressError::Internal(format!("Lock poisoned: {}", e)))?;

        schema::init_schema(&conn)?;

        Ok(())
    }

    /// Run a read operation against the connection
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ProgressError>
    where
        F: FnOnce(&Connection) -> Result<T, ProgressError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ProgressError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Execute a write operation with exclusive access
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, ProgressError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ProgressError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ProgressError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&mut conn)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats, ProgressError> {
        self.with_conn(|conn| {
            let row_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM user_study_progress", [], |row| {
                    row.get(0)
                })
                .map_err(|e| ProgressError::StoreUnavailable(format!("Query failed: {}", e)))?;

            let user_count: i64 = conn
                .query_row(
                    "SELECT COUNT(DISTINCT user_id) FROM user_study_progress",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| ProgressError::StoreUnavailable(format!("Query failed: {}", e)))?;

            Ok(DbStats {
                progress_rows: row_count as u64,
                users: user_count as u64,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub progress_rows: u64,
    pub users: u64,
}

// Re-exports
pub use progress::{ProgressRow, ProgressUpdate, UserScope};
