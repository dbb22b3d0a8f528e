//! Event system for progress operations
//!
//! Broadcast bus for notifying listeners about progress milestones.
//! Useful for:
//! - Celebration UI on chapter/study completion
//! - Audit logging
//! - Unlock notifications

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Progress events emitted by the service layer
///
/// `ChapterCompleted` and `StudyCompleted` fire exactly once per completion
/// transition; idempotent repeat writes stay silent.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PageRead {
        study_id: u32,
        chapter_id: u32,
        page: u32,
        pages_completed: u32,
    },
    ChapterCompleted {
        study_id: u32,
        chapter_id: u32,
    },
    StudyCompleted {
        study_id: u32,
    },
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Event bus for broadcasting progress events
pub struct EventBus {
    sender: broadcast::Sender<ProgressEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new event bus with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: ProgressEvent) {
        trace!(event = ?event, "Emitting progress event");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ChapterCompleted {
                study_id,
                chapter_id,
            } => {
                debug!(study = study_id, chapter = chapter_id, "Chapter completed");
            }
            ProgressEvent::StudyCompleted { study_id } => {
                debug!(study = study_id, "Study completed");
            }
            _ => {
                trace!(event = ?event, "Progress event");
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}
