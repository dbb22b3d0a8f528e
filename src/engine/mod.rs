//! Progression engine - pure derivation and mutation planning
//!
//! Merges the immutable catalog with fetched progress rows into derived
//! chapter/study state, and plans progress-advancing mutations. Everything
//! here is a synchronous, CPU-bound reduction over small in-memory lists;
//! all I/O lives in the store and the service layer.
//!
//! Unlock gating is strictly sequential: a chapter is unlocked iff it is the
//! first of its study or the preceding chapter's *derived* completion is
//! true. A chapter can never be unlocked out of order, even if its own row
//! claims completion (rows can be written by external processes). Studies
//! gate the same way, one level up, in catalog order.

pub mod stats;

use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, Study};
use crate::db::{ProgressRow, ProgressUpdate};
use crate::error::ProgressError;

/// Derived state of one chapter, recomputed fresh on every query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub study_id: u32,
    pub chapter_id: u32,
    pub ordinal: u32,
    pub title: String,
    pub total_pages: u32,
    pub pages_completed: u32,
    pub progress_percent: u32,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

/// Derived state of one study: its chapters plus rolled-up summary fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyProgress {
    pub study_id: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub chapters: Vec<ChapterProgress>,
    pub total_chapters: u32,
    pub completed_chapters: u32,
    pub progress_percent: u32,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

/// Planned outcome of a progress mutation
///
/// `update` is what the store must persist. `chapter` reflects the state
/// after the update. The transition flags are true exactly when this call
/// flipped completion from false to true, so completion is reported once,
/// never on later idempotent repeats.
#[derive(Debug, Clone)]
pub struct PageReadPlan {
    pub update: ProgressUpdate,
    pub chapter: ChapterProgress,
    pub chapter_completed: bool,
    pub study_completed: bool,
}

/// Result of a persisted mutation: the stored row plus the derived outcome
#[derive(Debug, Clone)]
pub struct ProgressAdvancement {
    pub record: ProgressRow,
    pub chapter: ChapterProgress,
    pub chapter_completed: bool,
    pub study_completed: bool,
}

/// Integer percent in [0, 100]; a zero total yields 0, a full count yields
/// exactly 100.
fn percent(done: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (done * 100 / total).min(100)
    }
}

/// Derive per-chapter state for one study
///
/// Chapters are walked in ordinal order; an absent row counts as zero pages
/// and incomplete. Unlock is carried forward from the previous chapter's
/// derived completion, starting unlocked for the first chapter.
pub fn derive_chapter_views(study: &Study, rows: &[ProgressRow]) -> Vec<ChapterProgress> {
    let mut chapters: Vec<&crate::catalog::Chapter> = study.chapters.iter().collect();
    chapters.sort_by_key(|c| c.ordinal);

    let mut previous_complete = true;
    let mut views = Vec::with_capacity(chapters.len());

    for chapter in chapters {
        let row = rows
            .iter()
            .find(|r| r.study_id == study.id && r.chapter_id == chapter.id);

        let pages_completed = row.map(|r| r.pages_completed).unwrap_or(0);
        let is_completed = row.map(|r| r.is_chapter_complete).unwrap_or(false);

        views.push(ChapterProgress {
            study_id: study.id,
            chapter_id: chapter.id,
            ordinal: chapter.ordinal,
            title: chapter.title.clone(),
            total_pages: chapter.total_pages,
            pages_completed,
            progress_percent: percent(pages_completed, chapter.total_pages),
            is_completed,
            is_unlocked: previous_complete,
        });

        previous_complete = is_completed;
    }

    views
}

/// Derive state for every study in the catalog
///
/// Studies gate sequentially in catalog order (id ascending): the first is
/// always unlocked, each later one unlocks once its predecessor is complete.
pub fn derive_study_views(catalog: &[Study], rows: &[ProgressRow]) -> Vec<StudyProgress> {
    let mut ordered: Vec<&Study> = catalog.iter().collect();
    ordered.sort_by_key(|s| s.id);

    let mut previous_complete = true;
    let mut views = Vec::with_capacity(ordered.len());

    for study in ordered {
        let chapters = derive_chapter_views(study, rows);
        let total_chapters = chapters.len() as u32;
        let completed_chapters = chapters.iter().filter(|c| c.is_completed).count() as u32;
        let is_completed = chapters.iter().all(|c| c.is_completed);

        views.push(StudyProgress {
            study_id: study.id,
            title: study.title.clone(),
            description: study.description.clone(),
            difficulty: study.difficulty,
            chapters,
            total_chapters,
            completed_chapters,
            progress_percent: percent(completed_chapters, total_chapters),
            is_completed,
            is_unlocked: previous_complete,
        });

        previous_complete = is_completed;
    }

    views
}

/// Plan a page-read mutation
///
/// Rejects locked studies and chapters (the mutation is a no-op signaled as
/// an error) and pages outside [1, total_pages]. Pages only ever advance:
/// re-reading an earlier page never lowers `pages_completed`.
pub fn record_page_read(
    catalog: &[Study],
    rows: &[ProgressRow],
    study_id: u32,
    chapter_id: u32,
    page: u32,
) -> Result<PageReadPlan, ProgressError> {
    let (_, chapter) = lookup(catalog, study_id, chapter_id)?;

    if page < 1 || page > chapter.total_pages {
        return Err(ProgressError::PageOutOfRange {
            page,
            total_pages: chapter.total_pages,
        });
    }

    plan_advance(catalog, rows, study_id, chapter_id, |existing_pages| {
        existing_pages.max(page)
    })
}

/// Plan a forced chapter completion
///
/// Sets `pages_completed` to the chapter's page count directly. Gating,
/// idempotence, and completion-transition reporting match `record_page_read`.
pub fn mark_chapter_complete(
    catalog: &[Study],
    rows: &[ProgressRow],
    study_id: u32,
    chapter_id: u32,
) -> Result<PageReadPlan, ProgressError> {
    let (_, chapter) = lookup(catalog, study_id, chapter_id)?;
    let total_pages = chapter.total_pages;

    plan_advance(catalog, rows, study_id, chapter_id, move |existing_pages| {
        existing_pages.max(total_pages)
    })
}

fn lookup<'a>(
    catalog: &'a [Study],
    study_id: u32,
    chapter_id: u32,
) -> Result<(&'a Study, &'a crate::catalog::Chapter), ProgressError> {
    let study = catalog
        .iter()
        .find(|s| s.id == study_id)
        .ok_or(ProgressError::UnknownStudy(study_id))?;
    let chapter = study
        .chapter(chapter_id)
        .ok_or(ProgressError::UnknownChapter {
            study_id,
            chapter_id,
        })?;
    Ok((study, chapter))
}

fn plan_advance<F>(
    catalog: &[Study],
    rows: &[ProgressRow],
    study_id: u32,
    chapter_id: u32,
    advance: F,
) -> Result<PageReadPlan, ProgressError>
where
    F: FnOnce(u32) -> u32,
{
    let (study, chapter) = lookup(catalog, study_id, chapter_id)?;

    // Gate against current derived state, not raw rows
    let before = derive_study_views(catalog, rows);
    let study_before = before
        .iter()
        .find(|s| s.study_id == study_id)
        .ok_or(ProgressError::UnknownStudy(study_id))?;

    if !study_before.is_unlocked {
        return Err(ProgressError::StudyLocked(study_id));
    }

    let chapter_before = study_before
        .chapters
        .iter()
        .find(|c| c.chapter_id == chapter_id)
        .ok_or(ProgressError::UnknownChapter {
            study_id,
            chapter_id,
        })?;

    if !chapter_before.is_unlocked {
        return Err(ProgressError::ChapterLocked {
            study_id,
            chapter_id,
        });
    }

    let existing_pages = chapter_before.pages_completed;
    let was_complete = chapter_before.is_completed;

    let pages_completed = advance(existing_pages);
    let is_chapter_complete = pages_completed >= chapter.total_pages;

    let update = ProgressUpdate {
        study_id,
        chapter_id,
        pages_completed,
        is_chapter_complete,
    };

    // Re-derive with the update applied so the returned view reflects the
    // post-mutation state (including any newly unlocked successor).
    let merged = apply_update(rows, &update);
    let after = derive_study_views(catalog, &merged);
    let study_after = after
        .iter()
        .find(|s| s.study_id == study_id)
        .ok_or(ProgressError::UnknownStudy(study_id))?;
    let chapter_after = study_after
        .chapters
        .iter()
        .find(|c| c.chapter_id == chapter_id)
        .ok_or(ProgressError::UnknownChapter {
            study_id,
            chapter_id,
        })?;

    debug_assert_eq!(chapter_after.total_pages, chapter.total_pages);
    debug_assert_eq!(study_after.total_chapters, study.chapters.len() as u32);

    Ok(PageReadPlan {
        update,
        chapter: chapter_after.clone(),
        chapter_completed: is_chapter_complete && !was_complete,
        study_completed: study_after.is_completed && !study_before.is_completed,
    })
}

/// Overlay one update onto a fetched row set, in-memory only
fn apply_update(rows: &[ProgressRow], update: &ProgressUpdate) -> Vec<ProgressRow> {
    let mut merged: Vec<ProgressRow> = rows.to_vec();
    match merged
        .iter_mut()
        .find(|r| r.study_id == update.study_id && r.chapter_id == update.chapter_id)
    {
        Some(row) => {
            row.pages_completed = update.pages_completed;
            row.is_chapter_complete = update.is_chapter_complete;
        }
        None => merged.push(ProgressRow {
            study_id: update.study_id,
            chapter_id: update.chapter_id,
            pages_completed: update.pages_completed,
            is_chapter_complete: update.is_chapter_complete,
            created_at: String::new(),
            updated_at: String::new(),
        }),
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Chapter;

    fn chapter(id: u32, pages: u32) -> Chapter {
        Chapter {
            id,
            ordinal: id,
            title: format!("Chapter {}", id),
            total_pages: pages,
        }
    }

    fn study(id: u32, pages_per_chapter: &[u32]) -> Study {
        Study {
            id,
            title: format!("Study {}", id),
            description: String::new(),
            difficulty: Difficulty::Beginner,
            chapters: pages_per_chapter
                .iter()
                .enumerate()
                .map(|(i, pages)| chapter(i as u32 + 1, *pages))
                .collect(),
        }
    }

    fn row(study_id: u32, chapter_id: u32, pages: u32, complete: bool) -> ProgressRow {
        ProgressRow {
            study_id,
            chapter_id,
            pages_completed: pages,
            is_chapter_complete: complete,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_first_chapter_unlocked_without_rows() {
        let s = study(1, &[3, 2]);
        let views = derive_chapter_views(&s, &[]);

        assert!(views[0].is_unlocked);
        assert_eq!(views[0].progress_percent, 0);
        assert!(!views[1].is_unlocked);
    }

    #[test]
    fn test_unlock_follows_previous_derived_completion() {
        let s = study(1, &[3, 3, 3]);

        // Chapter 2's own row claims completion, but chapter 1 is untouched:
        // chapter 2 must stay locked and chapter 3 must not inherit anything.
        let rows = vec![row(1, 2, 3, true)];
        let views = derive_chapter_views(&s, &rows);

        assert!(views[0].is_unlocked);
        assert!(!views[1].is_unlocked);
        assert!(views[1].is_completed);
        assert!(views[2].is_unlocked, "gating reads derived completion of the predecessor");
    }

    #[test]
    fn test_sequential_unlock_invariant() {
        let s = study(1, &[2, 2, 2, 2]);
        let rows = vec![row(1, 1, 2, true), row(1, 2, 1, false)];
        let views = derive_chapter_views(&s, &rows);

        assert!(views[0].is_unlocked);
        for i in 1..views.len() {
            assert_eq!(views[i].is_unlocked, views[i - 1].is_completed);
        }
    }

    #[test]
    fn test_percent_boundaries() {
        let s = study(1, &[0, 4]);
        let rows = vec![row(1, 2, 4, true)];
        let views = derive_chapter_views(&s, &rows);

        // Zero-page chapter never divides by zero
        assert_eq!(views[0].progress_percent, 0);
        // Full chapter is exactly 100
        assert_eq!(views[1].progress_percent, 100);
    }

    #[test]
    fn test_study_gating_mirrors_chapter_gating() {
        let catalog = vec![study(1, &[2]), study(2, &[2])];

        let locked = derive_study_views(&catalog, &[]);
        assert!(locked[0].is_unlocked);
        assert!(!locked[1].is_unlocked);

        let rows = vec![row(1, 1, 2, true)];
        let unlocked = derive_study_views(&catalog, &rows);
        assert!(unlocked[0].is_completed);
        assert!(unlocked[1].is_unlocked, "study 2 opens with zero recorded progress of its own");
        assert_eq!(unlocked[1].progress_percent, 0);
    }

    #[test]
    fn test_record_page_read_monotonic() {
        let catalog = vec![study(1, &[5])];

        let first = record_page_read(&catalog, &[], 1, 1, 3).unwrap();
        assert_eq!(first.update.pages_completed, 3);

        let rows = vec![row(1, 1, 3, false)];
        let second = record_page_read(&catalog, &rows, 1, 1, 1).unwrap();
        assert_eq!(second.update.pages_completed, 3, "earlier pages never regress progress");
        assert!(!second.chapter_completed);
    }

    #[test]
    fn test_completion_exactness_and_single_transition() {
        let catalog = vec![study(1, &[3])];
        let mut rows: Vec<ProgressRow> = vec![];

        let mut transitions = 0;
        for page in 1..=3 {
            let plan = record_page_read(&catalog, &rows, 1, 1, page).unwrap();
            if plan.chapter_completed {
                transitions += 1;
            }
            assert_eq!(
                plan.update.is_chapter_complete,
                plan.update.pages_completed == 3
            );
            rows = vec![row(1, 1, plan.update.pages_completed, plan.update.is_chapter_complete)];
        }
        assert_eq!(transitions, 1);

        // Re-reading the last page after completion reports nothing new
        let repeat = record_page_read(&catalog, &rows, 1, 1, 3).unwrap();
        assert!(!repeat.chapter_completed);
        assert_eq!(repeat.chapter.progress_percent, 100);
    }

    #[test]
    fn test_locked_chapter_rejects_mutation() {
        let catalog = vec![study(1, &[3, 3])];

        let err = record_page_read(&catalog, &[], 1, 2, 1).unwrap_err();
        assert!(matches!(err, ProgressError::ChapterLocked { chapter_id: 2, .. }));
    }

    #[test]
    fn test_locked_study_rejects_mutation() {
        let catalog = vec![study(1, &[3]), study(2, &[3])];

        let err = record_page_read(&catalog, &[], 2, 1, 1).unwrap_err();
        assert!(matches!(err, ProgressError::StudyLocked(2)));
    }

    #[test]
    fn test_page_out_of_range() {
        let catalog = vec![study(1, &[3])];

        assert!(matches!(
            record_page_read(&catalog, &[], 1, 1, 0).unwrap_err(),
            ProgressError::PageOutOfRange { .. }
        ));
        assert!(matches!(
            record_page_read(&catalog, &[], 1, 1, 4).unwrap_err(),
            ProgressError::PageOutOfRange { .. }
        ));
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = vec![study(1, &[3])];

        assert!(matches!(
            record_page_read(&catalog, &[], 9, 1, 1).unwrap_err(),
            ProgressError::UnknownStudy(9)
        ));
        assert!(matches!(
            record_page_read(&catalog, &[], 1, 9, 1).unwrap_err(),
            ProgressError::UnknownChapter { chapter_id: 9, .. }
        ));
    }

    #[test]
    fn test_mark_chapter_complete() {
        let catalog = vec![study(1, &[5])];

        let plan = mark_chapter_complete(&catalog, &[], 1, 1).unwrap();
        assert_eq!(plan.update.pages_completed, 5);
        assert!(plan.update.is_chapter_complete);
        assert!(plan.chapter_completed);
        assert!(plan.study_completed);

        // Marking again is idempotent and silent
        let rows = vec![row(1, 1, 5, true)];
        let again = mark_chapter_complete(&catalog, &rows, 1, 1).unwrap();
        assert_eq!(again.update.pages_completed, 5);
        assert!(!again.chapter_completed);
        assert!(!again.study_completed);
    }

    #[test]
    fn test_two_chapter_scenario() {
        // One study, chapters of 3 and 2 pages, no prior rows.
        let catalog = vec![study(1, &[3, 2])];

        let fresh = derive_study_views(&catalog, &[]);
        assert!(fresh[0].chapters[0].is_unlocked);
        assert_eq!(fresh[0].chapters[0].progress_percent, 0);
        assert!(!fresh[0].chapters[1].is_unlocked);
        assert_eq!(fresh[0].progress_percent, 0);
        assert!(fresh[0].is_unlocked);

        let plan = record_page_read(&catalog, &[], 1, 1, 3).unwrap();
        assert!(plan.chapter_completed);
        assert!(!plan.study_completed);
        assert_eq!(plan.chapter.progress_percent, 100);

        let rows = vec![row(1, 1, 3, true)];
        let after = derive_study_views(&catalog, &rows);
        assert!(after[0].chapters[0].is_completed);
        assert!(after[0].chapters[1].is_unlocked);
        assert_eq!(after[0].chapters[1].progress_percent, 0);
        assert_eq!(after[0].progress_percent, 50);
    }
}
