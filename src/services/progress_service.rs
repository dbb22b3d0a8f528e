//! Progress service - async orchestration over the engine and store
//!
//! Wraps the pure progression engine with catalog/store I/O and event
//! emission. Every mutation runs fetch, plan, upsert strictly in that order
//! so the persisted row always reflects the just-computed monotonic maximum,
//! never a stale read. A store failure surfaces to the caller and nothing is
//! partially applied; derived state is recomputed from scratch on the next
//! call, so an abandoned in-flight call cannot corrupt a later one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::CatalogProvider;
use crate::engine::{self, stats, ChapterProgress, ProgressAdvancement, StudyProgress};
use crate::error::ProgressError;
use crate::store::ProgressStore;

use super::events::{EventBus, ProgressEvent};

/// Progress service for one user's study journey
pub struct ProgressService {
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn ProgressStore>,
    events: Arc<EventBus>,
}

impl ProgressService {
    /// Create a new progress service
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<dyn ProgressStore>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            catalog,
            store,
            events,
        }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Derive the full study list with progress, unlock, and percent state
    pub async fn study_overview(&self) -> Result<Vec<StudyProgress>, ProgressError> {
        let catalog = self.catalog.catalog()?;
        let ids: Vec<u32> = catalog.iter().map(|s| s.id).collect();
        let rows = self.store.fetch_progress(Some(&ids)).await?;
        Ok(engine::derive_study_views(&catalog, &rows))
    }

    /// Derive one study's state, chapters included
    pub async fn study_detail(&self, study_id: u32) -> Result<StudyProgress, ProgressError> {
        self.study_overview()
            .await?
            .into_iter()
            .find(|s| s.study_id == study_id)
            .ok_or(ProgressError::UnknownStudy(study_id))
    }

    /// Summary counters across the whole catalog
    pub async fn overview_stats(&self) -> Result<stats::CatalogStats, ProgressError> {
        let views = self.study_overview().await?;
        Ok(stats::calculate_stats(&views))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Record that the user finished reading a page
    ///
    /// Rejections (locked unit, page out of range) are signaled errors and
    /// write nothing. Completion transitions are reported once, on the call
    /// that caused them.
    pub async fn record_page_read(
        &self,
        study_id: u32,
        chapter_id: u32,
        page: u32,
    ) -> Result<ProgressAdvancement, ProgressError> {
        let catalog = self.catalog.catalog()?;
        let rows = self.store.fetch_progress(None).await?;

        let plan = engine::record_page_read(&catalog, &rows, study_id, chapter_id, page)?;
        let record = self.store.upsert_progress(&plan.update).await.map_err(|e| {
            warn!(study = study_id, chapter = chapter_id, error = %e, "Progress upsert failed");
            e
        })?;

        self.events.emit(ProgressEvent::PageRead {
            study_id,
            chapter_id,
            page,
            pages_completed: record.pages_completed,
        });
        self.emit_completions(&plan);

        debug!(
            study = study_id,
            chapter = chapter_id,
            page,
            pages = record.pages_completed,
            "Recorded page read"
        );

        Ok(ProgressAdvancement {
            record,
            chapter: plan.chapter,
            chapter_completed: plan.chapter_completed,
            study_completed: plan.study_completed,
        })
    }

    /// Force a chapter to its completed state
    pub async fn mark_chapter_complete(
        &self,
        study_id: u32,
        chapter_id: u32,
    ) -> Result<ProgressAdvancement, ProgressError> {
        let catalog = self.catalog.catalog()?;
        let rows = self.store.fetch_progress(None).await?;

        let plan = engine::mark_chapter_complete(&catalog, &rows, study_id, chapter_id)?;
        let record = self.store.upsert_progress(&plan.update).await?;

        self.emit_completions(&plan);

        Ok(ProgressAdvancement {
            record,
            chapter: plan.chapter,
            chapter_completed: plan.chapter_completed,
            study_completed: plan.study_completed,
        })
    }

    fn emit_completions(&self, plan: &engine::PageReadPlan) {
        if plan.chapter_completed {
            self.events.emit(ProgressEvent::ChapterCompleted {
                study_id: plan.update.study_id,
                chapter_id: plan.update.chapter_id,
            });
        }
        if plan.study_completed {
            self.events.emit(ProgressEvent::StudyCompleted {
                study_id: plan.update.study_id,
            });
        }
    }

    /// Derive one chapter's state (detail screens)
    pub async fn chapter_detail(
        &self,
        study_id: u32,
        chapter_id: u32,
    ) -> Result<ChapterProgress, ProgressError> {
        let study = self.study_detail(study_id).await?;
        study
            .chapters
            .into_iter()
            .find(|c| c.chapter_id == chapter_id)
            .ok_or(ProgressError::UnknownChapter {
                study_id,
                chapter_id,
            })
    }
}
