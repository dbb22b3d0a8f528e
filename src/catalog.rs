//! Study catalog - immutable course structure
//!
//! The catalog is read-only configuration injected into the engine and
//! services. Two independent catalogs ship with the app: the general Bible
//! studies (ids 1-6) and the family/group studies (ids 7-12). The engine is
//! catalog-agnostic and works over any ordered study list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ProgressError;

/// Difficulty tier of a study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// A chapter within a study
///
/// `ordinal` is the 1-based, contiguous position used for unlock gating;
/// `id` is unique within the owning study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub ordinal: u32,
    pub title: String,
    pub total_pages: u32,
}

/// A top-level study course
///
/// Catalog order equals id ascending. Unlock state is never stored on the
/// study itself; it is derived from the preceding study's completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub chapters: Vec<Chapter>,
}

impl Study {
    /// Look up a chapter by id
    pub fn chapter(&self, chapter_id: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }
}

/// Source of the ordered study list
///
/// The static catalog never fails; a remote-backed implementation fails with
/// `CatalogUnavailable` until the source is reachable again.
pub trait CatalogProvider: Send + Sync {
    fn catalog(&self) -> Result<Vec<Study>, ProgressError>;
}

/// In-memory catalog seeded at construction
pub struct StaticCatalog {
    studies: Vec<Study>,
}

impl StaticCatalog {
    /// Build a catalog from an explicit study list, sorted into id order
    pub fn new(mut studies: Vec<Study>) -> Self {
        studies.sort_by_key(|s| s.id);
        Self { studies }
    }

    /// The general Bible studies (ids 1-6)
    pub fn general() -> Self {
        Self::new(vec![
            study(
                1,
                "Foundations of Faith",
                "A comprehensive study exploring the fundamental principles of Christian faith, \
                 designed to strengthen your spiritual foundation.",
                Difficulty::Beginner,
                foundations_chapters(),
            ),
            study(
                2,
                "The Life of Jesus",
                "Walk through the ministry of Christ from Bethlehem to the empty tomb.",
                Difficulty::Intermediate,
                numbered_chapters(15),
            ),
            study(
                3,
                "Psalms and Worship",
                "Songs of praise, lament, and trust for the worshipping heart.",
                Difficulty::Beginner,
                numbered_chapters(8),
            ),
            study(
                4,
                "Parables and Teachings",
                "The stories Jesus told and what they ask of us.",
                Difficulty::Intermediate,
                numbered_chapters(10),
            ),
            study(
                5,
                "Letters to the Churches",
                "The epistles read as pastoral letters to living congregations.",
                Difficulty::Advanced,
                numbered_chapters(14),
            ),
            study(
                6,
                "Prophecies and Revelation",
                "Prophetic literature and the hope of all things made new.",
                Difficulty::Advanced,
                numbered_chapters(18),
            ),
        ])
    }

    /// The family/group studies (ids 7-12), disjoint from the general catalog
    pub fn family() -> Self {
        Self::new(vec![
            study(
                7,
                "Family Devotions - Psalms",
                "Shared devotional sessions through the Psalms for the whole household.",
                Difficulty::Beginner,
                numbered_chapters(12),
            ),
            study(
                8,
                "The Parables Together",
                "Discussing the parables as a family, one story at a time.",
                Difficulty::Beginner,
                numbered_chapters(10),
            ),
            study(
                9,
                "Christmas Story Study",
                "The nativity accounts for the Advent season.",
                Difficulty::Beginner,
                numbered_chapters(6),
            ),
            study(
                10,
                "Proverbs for Families",
                "Practical wisdom for daily life under one roof.",
                Difficulty::Beginner,
                numbered_chapters(10),
            ),
            study(
                11,
                "The Fruit of the Spirit",
                "Nine sessions on character shaped by the Spirit.",
                Difficulty::Intermediate,
                numbered_chapters(9),
            ),
            study(
                12,
                "Stories of Grace",
                "Accounts of forgiveness and restoration across both testaments.",
                Difficulty::Intermediate,
                numbered_chapters(8),
            ),
        ])
    }
}

impl CatalogProvider for StaticCatalog {
    fn catalog(&self) -> Result<Vec<Study>, ProgressError> {
        Ok(self.studies.clone())
    }
}

/// Pages per chapter in the seeded catalogs
const DEFAULT_CHAPTER_PAGES: u32 = 3;

fn study(
    id: u32,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    chapters: Vec<Chapter>,
) -> Study {
    Study {
        id,
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        chapters,
    }
}

/// Chapter titles for "Foundations of Faith"
fn foundations_chapters() -> Vec<Chapter> {
    const TITLES: [&str; 12] = [
        "Understanding God's Love",
        "The Nature of Faith",
        "Prayer and Communication",
        "Scripture and Truth",
        "Grace and Forgiveness",
        "Community and Fellowship",
        "Service and Ministry",
        "Spiritual Growth",
        "Overcoming Challenges",
        "Living with Purpose",
        "Sharing Your Faith",
        "Walking in Victory",
    ];

    TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| Chapter {
            id: i as u32 + 1,
            ordinal: i as u32 + 1,
            title: format!("Chapter {}: {}", i + 1, title),
            total_pages: DEFAULT_CHAPTER_PAGES,
        })
        .collect()
}

/// Generic numbered chapters for studies without authored chapter titles yet
fn numbered_chapters(count: u32) -> Vec<Chapter> {
    (1..=count)
        .map(|n| Chapter {
            id: n,
            ordinal: n,
            title: format!("Study Topic {}", n),
            total_pages: DEFAULT_CHAPTER_PAGES,
        })
        .collect()
}
