//! Aggregate statistics over derived study views
//!
//! Pure reduction, no I/O. The same function serves the general catalog and
//! the family catalog; nothing here knows which ids belong to which grouping.

use serde::{Deserialize, Serialize};

use super::StudyProgress;

/// Summary counters for one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_studies: u32,
    pub completed_studies: u32,
    /// Unlocked but not yet complete
    pub available_studies: u32,
    pub total_chapters: u32,
    pub completed_chapters: u32,
    pub overall_percent: u32,
}

/// Reduce derived study views into summary counters
pub fn calculate_stats(studies: &[StudyProgress]) -> CatalogStats {
    let total_studies = studies.len() as u32;
    let completed_studies = studies.iter().filter(|s| s.is_completed).count() as u32;
    let available_studies = studies
        .iter()
        .filter(|s| s.is_unlocked && !s.is_completed)
        .count() as u32;
    let total_chapters = studies.iter().map(|s| s.total_chapters).sum();
    let completed_chapters = studies.iter().map(|s| s.completed_chapters).sum();

    let overall_percent = if total_studies == 0 {
        0
    } else {
        completed_studies * 100 / total_studies
    };

    CatalogStats {
        total_studies,
        completed_studies,
        available_studies,
        total_chapters,
        completed_chapters,
        overall_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Chapter, Difficulty, Study};
    use crate::db::ProgressRow;
    use crate::engine::derive_study_views;

    fn catalog(counts: &[(u32, u32)]) -> Vec<Study> {
        counts
            .iter()
            .map(|(id, chapters)| Study {
                id: *id,
                title: format!("Study {}", id),
                description: String::new(),
                difficulty: Difficulty::Beginner,
                chapters: (1..=*chapters)
                    .map(|n| Chapter {
                        id: n,
                        ordinal: n,
                        title: format!("Chapter {}", n),
                        total_pages: 2,
                    })
                    .collect(),
            })
            .collect()
    }

    fn complete_study(study_id: u32, chapters: u32) -> Vec<ProgressRow> {
        (1..=chapters)
            .map(|c| ProgressRow {
                study_id,
                chapter_id: c,
                pages_completed: 2,
                is_chapter_complete: true,
                created_at: String::new(),
                updated_at: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_empty_catalog() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats.total_studies, 0);
        assert_eq!(stats.overall_percent, 0);
    }

    #[test]
    fn test_counts_roll_up() {
        let catalog = catalog(&[(1, 2), (2, 3), (3, 1)]);
        let rows = complete_study(1, 2);
        let views = derive_study_views(&catalog, &rows);
        let stats = calculate_stats(&views);

        assert_eq!(stats.total_studies, 3);
        assert_eq!(stats.completed_studies, 1);
        // Study 2 was unlocked by study 1 finishing; study 3 remains locked
        assert_eq!(stats.available_studies, 1);
        assert_eq!(stats.total_chapters, 6);
        assert_eq!(stats.completed_chapters, 2);
        assert_eq!(stats.overall_percent, 33);
    }

    #[test]
    fn test_catalog_agnostic() {
        // Two disjoint catalogs reduce independently with the same code path
        let general = catalog(&[(1, 1), (2, 1)]);
        let family = catalog(&[(7, 1), (8, 1)]);
        let rows = complete_study(7, 1);

        let general_stats = calculate_stats(&derive_study_views(&general, &rows));
        assert_eq!(general_stats.completed_studies, 0);

        let family_stats = calculate_stats(&derive_study_views(&family, &rows));
        assert_eq!(family_stats.completed_studies, 1);
        assert_eq!(family_stats.overall_percent, 50);
    }
}
