//! Derech - study progression engine for a church community app
//!
//! Computes derived progress state for Bible-study courses (Studies made of
//! ordered Chapters made of pages) and persists per-chapter progress rows.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (mobile client)
//!     ↓ views (camelCase, ts-rs bindings)
//! Service layer (async orchestration, events)
//!     ↓
//! Progression engine (pure derivation + mutation planning)
//!     ↓                          ↓
//! CatalogProvider          ProgressStore
//! (immutable study list)   (SQLite progress rows, user-scoped)
//! ```
//!
//! Derived state is never cached: every query recomputes chapter and study
//! views from the injected catalog plus the rows fetched for that call, so a
//! view can never go stale relative to its own fetch. Unlock gating is
//! strictly sequential at both levels: a chapter opens only once the previous
//! chapter of its study is complete, and a study opens only once the previous
//! study in catalog order is complete.

pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod services;
pub mod store;
pub mod views;

// Re-exports
pub use catalog::{CatalogProvider, Chapter, Difficulty, StaticCatalog, Study};
pub use config::Config;
pub use db::{ProgressDb, ProgressRow, ProgressUpdate, UserScope};
pub use engine::stats::{calculate_stats, CatalogStats};
pub use engine::{
    derive_chapter_views, derive_study_views, mark_chapter_complete, record_page_read,
    ChapterProgress, PageReadPlan, ProgressAdvancement, StudyProgress,
};
pub use error::ProgressError;
pub use i18n::{Locale, Translator};
pub use services::{EventBus, ProgressEvent, ProgressService, Services};
pub use store::{ProgressStore, SqliteProgressStore};
pub use views::{CatalogStatsView, ChapterView, StudyView};
