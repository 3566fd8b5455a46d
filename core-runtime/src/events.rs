//! # Event Bus System
//!
//! Broadcasts typed notifications from the gallery core to any number of
//! listeners using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event types**: [`GalleryEvent`] for the read path (page loads,
//!   invalidation, discarded stale pages) and [`UploadEvent`] for the write
//!   path (file stored, record registered, failures).
//! - **[`EventBus`]**: cloneable publisher handle.
//! - **[`EventStream`]**: receiver wrapper with predicate filtering.
//!
//! ```text
//! ┌──────────────────────┐  emit   ┌──────────┐  subscribe  ┌────────────┐
//! │ PaginationController ├────────>│          ├────────────>│ UI toasts  │
//! └──────────────────────┘         │ EventBus │             └────────────┘
//! ┌──────────────────────┐  emit   │          │  subscribe  ┌────────────┐
//! │ UploadPipeline       ├────────>│          ├────────────>│ Telemetry  │
//! └──────────────────────┘         └──────────┘             └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, UploadEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Upload(UploadEvent::Started)).ok();
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event, CoreEvent::Upload(UploadEvent::Started));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - `emit` fails only when nobody is subscribed. Producers in this workspace
//!   ignore that case.
//! - `RecvError::Lagged(n)`: the subscriber fell more than the buffer size
//!   behind and missed `n` events. Keep receiving.
//! - `RecvError::Closed`: every `EventBus` clone was dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, SendError},
    Receiver,
};

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Gallery(GalleryEvent),
    Upload(UploadEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Gallery(e) => e.description(),
            CoreEvent::Upload(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Gallery(GalleryEvent::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Upload(UploadEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Upload(UploadEvent::Rejected { .. }) => EventSeverity::Warning,
            CoreEvent::Upload(UploadEvent::Succeeded { .. }) => EventSeverity::Info,
            CoreEvent::Gallery(GalleryEvent::PageLoaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity, used by hosts to pick a toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Gallery Events
// ============================================================================

/// Read-path events from the pagination controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GalleryEvent {
    /// A page was merged into the collection.
    PageLoaded {
        /// Fetch generation the page belonged to.
        generation: u64,
        /// Records actually appended after de-duplication.
        items_added: usize,
        /// Collection size after the merge.
        total_items: usize,
        /// Whether another page can be requested.
        has_more: bool,
    },
    /// A listing call failed; previously loaded items stay visible.
    LoadFailed { message: String },
    /// The collection was cleared and the generation advanced.
    Invalidated { generation: u64 },
    /// A fetch finished after an invalidation and its page was dropped.
    StaleResponseDiscarded { generation: u64 },
}

impl GalleryEvent {
    fn description(&self) -> &str {
        match self {
            GalleryEvent::PageLoaded { .. } => "Gallery page loaded",
            GalleryEvent::LoadFailed { .. } => "Gallery page failed to load",
            GalleryEvent::Invalidated { .. } => "Gallery collection invalidated",
            GalleryEvent::StaleResponseDiscarded { .. } => "Stale gallery page discarded",
        }
    }
}

// ============================================================================
// Upload Events
// ============================================================================

/// Write-path events from the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum UploadEvent {
    /// Draft passed validation; the file is being sent to the object store.
    Started,
    /// The object store accepted the file.
    FileStored { url: String },
    /// Metadata was registered and the image is now part of the gallery.
    Succeeded { image_id: String, title: String },
    /// Submission failed after validation.
    Failed {
        /// `"upload"` or `"registration"`
        stage: String,
        message: String,
        /// Set when the file was stored but never registered
        orphaned_url: Option<String>,
    },
    /// Draft failed validation; no network call was made.
    Rejected { violations: Vec<String> },
}

impl UploadEvent {
    fn description(&self) -> &str {
        match self {
            UploadEvent::Started => "Upload started",
            UploadEvent::FileStored { .. } => "Image file stored",
            UploadEvent::Succeeded { .. } => "Image registered",
            UploadEvent::Failed { .. } => "Image upload failed",
            UploadEvent::Rejected { .. } => "Image draft rejected",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning is cheap; every clone publishes into the same channel. Each call to
/// [`subscribe`](Self::subscribe) creates an independent receiver that sees
/// every event emitted after it was created.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a bus buffering at most `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of receivers, or an error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` that skips events not matching a predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let uploads = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Upload(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next matching event.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once all senders are gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns the next matching event already buffered, or `None`.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
