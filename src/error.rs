//! Error types for derech

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Unknown study: {0}")]
    UnknownStudy(u32),

    #[error("Unknown chapter {chapter_id} in study {study_id}")]
    UnknownChapter { study_id: u32, chapter_id: u32 },

    #[error("Study {0} is locked")]
    StudyLocked(u32),

    #[error("Chapter {chapter_id} in study {study_id} is locked")]
    ChapterLocked { study_id: u32, chapter_id: u32 },

    #[error("Page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProgressError {
    /// True for failures a caller may retry (transport-level, not domain).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProgressError::StoreUnavailable(_) | ProgressError::CatalogUnavailable(_)
        )
    }
}
