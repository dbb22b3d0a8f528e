//! Progress row CRUD operations, scoped per user
//!
//! Every query filters by the `UserScope` the store was constructed with;
//! the progression engine itself never sees user identity.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProgressError;

/// User scope passed to all database operations
///
/// Identifies whose progress rows a store instance reads and writes, so
/// multiple users can share one database without interference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserScope {
    pub user_id: String,
}

impl UserScope {
    /// Create a new scope for the given user id
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Scope for a single-user local install
    pub fn local() -> Self {
        Self::new("local")
    }
}

impl std::fmt::Display for UserScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserScope({})", self.user_id)
    }
}

/// Persisted progress row for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub study_id: u32,
    pub chapter_id: u32,
    pub pages_completed: u32,
    pub is_chapter_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ProgressRow {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            study_id: row.get("study_id")?,
            chapter_id: row.get("chapter_id")?,
            pages_completed: row.get("pages_completed")?,
            is_chapter_complete: row.get("is_chapter_complete")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// State to persist for one chapter, produced by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub study_id: u32,
    pub chapter_id: u32,
    pub pages_completed: u32,
    pub is_chapter_complete: bool,
}

/// RFC 3339 UTC timestamp for row bookkeeping
pub fn current_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Get the progress row for one chapter, if any
pub fn get_progress(
    conn: &Connection,
    scope: &UserScope,
    study_id: u32,
    chapter_id: u32,
) -> Result<Option<ProgressRow>, ProgressError> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM user_study_progress
             WHERE user_id = ? AND study_id = ? AND chapter_id = ?",
        )
        .map_err(|e| ProgressError::StoreUnavailable(format!("Prepare failed: {}", e)))?;

    let mut rows = stmt
        .query(params![scope.user_id, study_id, chapter_id])
        .map_err(|e| ProgressError::StoreUnavailable(format!("Query failed: {}", e)))?;

    match rows
        .next()
        .map_err(|e| ProgressError::StoreUnavailable(format!("Row fetch failed: {}", e)))?
    {
        Some(row) => ProgressRow::from_row(row)
            .map(Some)
            .map_err(|e| ProgressError::Internal(format!("Row parse failed: {}", e))),
        None => Ok(None),
    }
}

/// Fetch all progress rows for the scope, optionally filtered to a study set
///
/// Rows come back ordered by (study_id, chapter_id) ascending. An empty
/// result is a normal outcome, not an error.
pub fn fetch_progress(
    conn: &Connection,
    scope: &UserScope,
    study_ids: Option<&[u32]>,
) -> Result<Vec<ProgressRow>, ProgressError> {
    use rusqlite::types::Value;

    let (sql, sql_params): (String, Vec<Value>) = match study_ids {
        None => (
            "SELECT * FROM user_study_progress
             WHERE user_id = ?
             ORDER BY study_id, chapter_id"
                .to_string(),
            vec![Value::Text(scope.user_id.clone())],
        ),
        Some([]) => return Ok(vec![]),
        Some(ids) => {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let mut values = Vec::with_capacity(ids.len() + 1);
            values.push(Value::Text(scope.user_id.clone()));
            values.extend(ids.iter().map(|id| Value::Integer(*id as i64)));
            (
                format!(
                    "SELECT * FROM user_study_progress
                     WHERE user_id = ? AND study_id IN ({})
                     ORDER BY study_id, chapter_id",
                    placeholders
                ),
                values,
            )
        }
    };

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ProgressError::StoreUnavailable(format!("Prepare failed: {}", e)))?;

    let mapped = stmt
        .query_map(rusqlite::params_from_iter(sql_params), |row| {
            ProgressRow::from_row(row)
        })
        .map_err(|e| ProgressError::StoreUnavailable(format!("Query failed: {}", e)))?;

    let mut result = vec![];
    for row in mapped {
        result.push(
            row.map_err(|e| ProgressError::Internal(format!("Row parse failed: {}", e)))?,
        );
    }

    debug!(user = %scope.user_id, rows = result.len(), "Fetched progress rows");
    Ok(result)
}

/// Create or update the progress row for one chapter
///
/// Idempotent on (study_id, chapter_id) within the scope: writing the same
/// state twice leaves identical pages/completion values. Last write wins;
/// there is no version check.
pub fn upsert_progress(
    conn: &mut Connection,
    scope: &UserScope,
    update: &ProgressUpdate,
) -> Result<ProgressRow, ProgressError> {
    let now = current_timestamp();
    let existing = get_progress(conn, scope, update.study_id, update.chapter_id)?;

    match existing {
        Some(_) => {
            conn.execute(
                "UPDATE user_study_progress
                 SET pages_completed = ?, is_chapter_complete = ?, updated_at = ?
                 WHERE user_id = ? AND study_id = ? AND chapter_id = ?",
                params![
                    update.pages_completed,
                    update.is_chapter_complete,
                    now,
                    scope.user_id,
                    update.study_id,
                    update.chapter_id,
                ],
            )
            .map_err(|e| ProgressError::StoreUnavailable(format!("Update failed: {}", e)))?;
        }
        None => {
            conn.execute(
                "INSERT INTO user_study_progress
                 (user_id, study_id, chapter_id, pages_completed, is_chapter_complete,
                  created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    scope.user_id,
                    update.study_id,
                    update.chapter_id,
                    update.pages_completed,
                    update.is_chapter_complete,
                    now,
                    now,
                ],
            )
            .map_err(|e| ProgressError::StoreUnavailable(format!("Insert failed: {}", e)))?;
        }
    }

    debug!(
        user = %scope.user_id,
        study = update.study_id,
        chapter = update.chapter_id,
        pages = update.pages_completed,
        complete = update.is_chapter_complete,
        "Upserted progress row"
    );

    get_progress(conn, scope, update.study_id, update.chapter_id)?
        .ok_or_else(|| ProgressError::Internal("Failed to retrieve upserted row".into()))
}

/// Progress row count for the scope
pub fn progress_count(conn: &Connection, scope: &UserScope) -> Result<i64, ProgressError> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_study_progress WHERE user_id = ?",
        params![scope.user_id],
        |row| row.get(0),
    )
    .map_err(|e| ProgressError::StoreUnavailable(format!("Count query failed: {}", e)))
}
