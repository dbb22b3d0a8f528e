//! Service layer for derech
//!
//! Services sit between a presentation layer and the pure engine/store:
//!
//! ```text
//! Presentation (thin)
//!     ↓
//! Service layer (orchestration, events)
//!     ↓                    ↓
//! Progression engine   ProgressStore
//! ```

pub mod events;
pub mod progress_service;

// Re-exports
pub use events::{EventBus, EventListener, LoggingEventListener, ProgressEvent};
pub use progress_service::ProgressService;

use std::sync::Arc;

use crate::catalog::CatalogProvider;
use crate::store::ProgressStore;

/// Service container for dependency injection
pub struct Services {
    pub progress: Arc<ProgressService>,
    pub events: Arc<EventBus>,
}

impl Services {
    /// Create all services over an injected catalog and store
    pub fn new(catalog: Arc<dyn CatalogProvider>, store: Arc<dyn ProgressStore>) -> Self {
        let events = Arc::new(EventBus::new());

        Self {
            progress: Arc::new(ProgressService::new(catalog, store, events.clone())),
            events,
        }
    }
}
