//! Progress store - persistence seam for progress rows
//!
//! The engine and service layer talk to this trait only; swapping the SQLite
//! reference implementation for a remote backend changes nothing above it.
//! Both operations are async because a real backend is a network hop; the
//! derivations themselves stay synchronous.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{progress, ProgressDb, ProgressRow, ProgressUpdate, UserScope};
use crate::error::ProgressError;

/// Persistence for per-chapter progress rows, scoped to one user
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch rows for the given studies (all studies when `None`), sorted by
    /// (study_id, chapter_id) ascending. No rows is an empty vec, not an
    /// error; an unreachable backend is `StoreUnavailable`.
    async fn fetch_progress(
        &self,
        study_ids: Option<&[u32]>,
    ) -> Result<Vec<ProgressRow>, ProgressError>;

    /// Idempotently create or overwrite the row for one chapter and return
    /// the stored state. Last write wins; there is no version check.
    async fn upsert_progress(
        &self,
        update: &ProgressUpdate,
    ) -> Result<ProgressRow, ProgressError>;
}

/// SQLite-backed progress store
pub struct SqliteProgressStore {
    db: Arc<ProgressDb>,
    scope: UserScope,
}

impl SqliteProgressStore {
    /// Create a store over an open database, scoped to one user
    pub fn new(db: Arc<ProgressDb>, scope: UserScope) -> Self {
        Self { db, scope }
    }

    /// The user scope this store reads and writes
    pub fn scope(&self) -> &UserScope {
        &self.scope
    }
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn fetch_progress(
        &self,
        study_ids: Option<&[u32]>,
    ) -> Result<Vec<ProgressRow>, ProgressError> {
        self.db
            .with_conn(|conn| progress::fetch_progress(conn, &self.scope, study_ids))
    }

    async fn upsert_progress(
        &self,
        update: &ProgressUpdate,
    ) -> Result<ProgressRow, ProgressError> {
        self.db
            .with_conn_mut(|conn| progress::upsert_progress(conn, &self.scope, update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let db = Arc::new(ProgressDb::open_in_memory().unwrap());
        let store = SqliteProgressStore::new(db, UserScope::local());

        assert!(store.fetch_progress(None).await.unwrap().is_empty());

        let stored = store
            .upsert_progress(&ProgressUpdate {
                study_id: 1,
                chapter_id: 1,
                pages_completed: 2,
                is_chapter_complete: false,
            })
            .await
            .unwrap();
        assert_eq!(stored.pages_completed, 2);

        let rows = store.fetch_progress(Some(&[1])).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chapter_id, 1);
    }
}
