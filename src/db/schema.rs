//! Database schema definitions

use rusqlite::Connection;
use tracing::info;

use crate::error::ProgressError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), ProgressError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new database schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        info!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &Connection) -> Result<i32, ProgressError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )
    .map_err(|e| {
        ProgressError::StoreUnavailable(format!("Failed to create schema_version table: {}", e))
    })?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), ProgressError> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| ProgressError::StoreUnavailable(format!("Failed to clear schema_version: {}", e)))?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?)",
        [version],
    )
    .map_err(|e| ProgressError::StoreUnavailable(format!("Failed to set schema_version: {}", e)))?;
    Ok(())
}

/// Create all tables
fn create_tables(conn: &Connection) -> Result<(), ProgressError> {
    conn.execute_batch(PROGRESS_SCHEMA)
        .map_err(|e| ProgressError::StoreUnavailable(format!("Failed to create progress table: {}", e)))?;

    Ok(())
}

/// Migrate schema from older version
fn migrate_schema(conn: &Connection, _from_version: i32) -> Result<(), ProgressError> {
    // Add migration steps here as the schema evolves
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Progress table schema
///
/// Rows are keyed by (user, study, chapter); pages_completed only ever grows
/// and is_chapter_complete mirrors pages_completed == total_pages at write
/// time. Rows are upserted, never deleted.
const PROGRESS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS user_study_progress (
    user_id TEXT NOT NULL,
    study_id INTEGER NOT NULL,
    chapter_id INTEGER NOT NULL,
    pages_completed INTEGER NOT NULL DEFAULT 0,
    is_chapter_complete INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, study_id, chapter_id)
);

CREATE INDEX IF NOT EXISTS idx_progress_user_study
    ON user_study_progress(user_id, study_id);
"#;
