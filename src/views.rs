//! View types for the client boundary
//!
//! These types use camelCase serialization for the TypeScript mobile client.
//! Internal types (engine output, db rows) stay snake_case.
//!
//! Pattern:
//! - Engine/service layer returns internal types (StudyProgress, etc.)
//! - The boundary converts to View types (StudyView, etc.)
//! - ts-rs generates camelCase TypeScript from View types

use serde::Serialize;
use ts_rs::TS;

use crate::catalog::Difficulty;
use crate::engine::stats::CatalogStats;
use crate::engine::{ChapterProgress, StudyProgress};

/// Chapter as shown on a study detail screen
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChapterView {
    pub id: u32,
    pub title: String,
    pub pages: u32,
    pub pages_completed: u32,
    /// Percent in [0, 100]
    pub progress: u32,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

impl From<ChapterProgress> for ChapterView {
    fn from(c: ChapterProgress) -> Self {
        Self {
            id: c.chapter_id,
            title: c.title,
            pages: c.total_pages,
            pages_completed: c.pages_completed,
            progress: c.progress_percent,
            is_completed: c.is_completed,
            is_unlocked: c.is_unlocked,
        }
    }
}

/// Study card / detail view
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StudyView {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub total_chapters: u32,
    pub completed_chapters: u32,
    /// Percent in [0, 100]
    pub progress: u32,
    pub is_completed: bool,
    pub is_unlocked: bool,
    pub chapters: Vec<ChapterView>,
}

impl From<StudyProgress> for StudyView {
    fn from(s: StudyProgress) -> Self {
        Self {
            id: s.study_id,
            title: s.title,
            description: s.description,
            difficulty: s.difficulty,
            total_chapters: s.total_chapters,
            completed_chapters: s.completed_chapters,
            progress: s.progress_percent,
            is_completed: s.is_completed,
            is_unlocked: s.is_unlocked,
            chapters: s.chapters.into_iter().map(ChapterView::from).collect(),
        }
    }
}

/// Progress overview card counters
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogStatsView {
    pub total_studies: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub total_chapters: u32,
    pub completed_chapters: u32,
    /// Percent in [0, 100]
    pub overall_progress: u32,
}

impl From<CatalogStats> for CatalogStatsView {
    fn from(s: CatalogStats) -> Self {
        Self {
            total_studies: s.total_studies,
            completed: s.completed_studies,
            in_progress: s.available_studies,
            total_chapters: s.total_chapters,
            completed_chapters: s.completed_chapters,
            overall_progress: s.overall_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_view_serializes_camel_case() {
        let view = StudyView {
            id: 1,
            title: "Foundations of Faith".into(),
            description: String::new(),
            difficulty: Difficulty::Beginner,
            total_chapters: 12,
            completed_chapters: 3,
            progress: 25,
            is_completed: false,
            is_unlocked: true,
            chapters: vec![],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totalChapters"], 12);
        assert_eq!(json["isUnlocked"], true);
        assert_eq!(json["difficulty"], "Beginner");
    }
}
