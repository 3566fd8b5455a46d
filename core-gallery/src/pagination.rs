//! # Cursor Pagination Controller
//!
//! Owns the gallery collection and drives "load more" over the backend's
//! opaque cursors.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──load_initial──> LoadingInitial ──┬─ cursor ──> Ready ──load_next──> LoadingNext
//!                                          ├─ none ────> Exhausted               │
//!                                          └─ error ───> Failed                  │
//! LoadingNext ──┬─ cursor ──> Ready
//!               ├─ none ────> Exhausted
//!               └─ error ───> Failed (load_next may retry the same cursor)
//! Failed ──load_initial──> LoadingInitial
//! any state ──invalidate──> Idle
//! ```
//!
//! ## Concurrency
//!
//! The guard and every state update run inside a short `parking_lot` critical
//! section that is released before the backend is awaited. Each fetch records
//! the generation current when it started; `invalidate` and `load_initial`
//! advance the generation, and a page whose generation is no longer current is
//! dropped on arrival instead of being merged.

use std::sync::Arc;

use bridge_traits::{BridgeError, GalleryBackend, ImagePage, ImageRecord};
use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::collection::GalleryCollection;
use crate::error::PaginationError;

/// Read-path state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationState {
    #[default]
    Idle,
    LoadingInitial,
    LoadingNext,
    Ready,
    Exhausted,
    Failed(PaginationError),
}

impl PaginationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaginationState::Idle => "idle",
            PaginationState::LoadingInitial => "loading_initial",
            PaginationState::LoadingNext => "loading_next",
            PaginationState::Ready => "ready",
            PaginationState::Exhausted => "exhausted",
            PaginationState::Failed(_) => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PaginationState::LoadingInitial | PaginationState::LoadingNext
        )
    }

    pub fn error(&self) -> Option<&PaginationError> {
        match self {
            PaginationState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Snapshot handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub items: Vec<ImageRecord>,
    /// `true` only in `Ready`
    pub can_load_more: bool,
    pub is_loading: bool,
    /// First page in flight (full-screen loading indicator)
    pub is_loading_initial: bool,
    /// Next page in flight ("load more" spinner)
    pub is_fetching_next: bool,
    /// Present iff the state is `Failed`
    pub error: Option<PaginationError>,
}

/// Result of a fetch that was allowed to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the collection.
    Applied { items_added: usize, has_more: bool },
    /// The collection was invalidated while the fetch was in flight; the page
    /// was discarded.
    Superseded,
}

/// Something whose cached gallery data can be thrown away.
///
/// The upload pipeline holds one of these so it can force a refetch after a
/// successful registration without touching the collection itself.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    Next,
}

#[derive(Debug, Default)]
struct Inner {
    state: PaginationState,
    collection: GalleryCollection,
    next_cursor: Option<String>,
    generation: u64,
    /// The last failure came from a next-page fetch and `next_cursor` still
    /// points at the page that failed
    next_retryable: bool,
}

/// Owns the [`GalleryCollection`] and serializes listing calls.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct PaginationController {
    backend: Arc<dyn GalleryBackend>,
    event_bus: Option<EventBus>,
    inner: Mutex<Inner>,
}

impl PaginationController {
    pub fn new(backend: Arc<dyn GalleryBackend>) -> Self {
        Self {
            backend,
            event_bus: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Publish read-path events on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Fetch the first page and replace the collection with it.
    ///
    /// Accepted from `Idle` and `Failed`. On failure the previous collection
    /// is left as it was.
    #[instrument(skip(self))]
    pub async fn load_initial(&self) -> Result<FetchOutcome, PaginationError> {
        let generation = {
            let mut inner = self.inner.lock();
            match inner.state {
                PaginationState::Idle | PaginationState::Failed(_) => {}
                PaginationState::LoadingInitial | PaginationState::LoadingNext => {
                    debug!("load_initial rejected: fetch in flight");
                    return Err(PaginationError::FetchInProgress);
                }
                ref other => {
                    return Err(PaginationError::InvalidState {
                        operation: "load the first page",
                        state: other.as_str(),
                    });
                }
            }
            inner.generation += 1;
            inner.state = PaginationState::LoadingInitial;
            inner.generation
        };

        debug!(generation, "Fetching first gallery page");
        let result = self.backend.list_images(None).await;
        self.complete_fetch(FetchKind::Initial, generation, result)
    }

    /// Fetch the page after the last known cursor and append it.
    ///
    /// Accepted from `Ready`, and from `Failed` when the failure was itself a
    /// next-page fetch. Rejected with [`PaginationError::FetchInProgress`]
    /// while any fetch is outstanding; no request is sent in that case.
    #[instrument(skip(self))]
    pub async fn load_next(&self) -> Result<FetchOutcome, PaginationError> {
        let (generation, cursor) = {
            let mut inner = self.inner.lock();
            match inner.state {
                PaginationState::Ready => {}
                PaginationState::Failed(_) if inner.next_retryable => {}
                PaginationState::LoadingInitial | PaginationState::LoadingNext => {
                    debug!("load_next rejected: fetch in flight");
                    return Err(PaginationError::FetchInProgress);
                }
                ref other => {
                    return Err(PaginationError::InvalidState {
                        operation: "load the next page",
                        state: other.as_str(),
                    });
                }
            }
            let Some(cursor) = inner.next_cursor.clone() else {
                return Err(PaginationError::InvalidState {
                    operation: "load the next page",
                    state: "without a cursor",
                });
            };
            inner.state = PaginationState::LoadingNext;
            (inner.generation, cursor)
        };

        debug!(generation, "Fetching next gallery page");
        let result = self.backend.list_images(Some(cursor)).await;
        self.complete_fetch(FetchKind::Next, generation, result)
    }

    /// Drop the collection and return to `Idle`.
    ///
    /// Any fetch still in flight will have its result discarded.
    pub fn invalidate(&self) {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.collection.clear();
            inner.next_cursor = None;
            inner.next_retryable = false;
            inner.state = PaginationState::Idle;
            inner.generation
        };

        info!(generation, "Gallery collection invalidated");
        self.emit(GalleryEvent::Invalidated { generation });
    }

    pub fn current_view(&self) -> GalleryView {
        let inner = self.inner.lock();
        GalleryView {
            items: inner.collection.items().to_vec(),
            can_load_more: inner.state == PaginationState::Ready,
            is_loading: inner.state.is_loading(),
            is_loading_initial: inner.state == PaginationState::LoadingInitial,
            is_fetching_next: inner.state == PaginationState::LoadingNext,
            error: inner.state.error().cloned(),
        }
    }

    pub fn state(&self) -> PaginationState {
        self.inner.lock().state.clone()
    }

    /// Current fetch generation
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn len(&self) -> usize {
        self.inner.lock().collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().collection.is_empty()
    }

    fn complete_fetch(
        &self,
        kind: FetchKind,
        generation: u64,
        result: Result<ImagePage, BridgeError>,
    ) -> Result<FetchOutcome, PaginationError> {
        let mut inner = self.inner.lock();

        if inner.generation != generation {
            drop(inner);
            debug!(generation, "Discarding stale gallery page");
            self.emit(GalleryEvent::StaleResponseDiscarded { generation });
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let next_cursor = page.next_cursor.filter(|cursor| !cursor.is_empty());
                let items_added = match kind {
                    FetchKind::Initial => {
                        inner.collection = GalleryCollection::from_page(page.items);
                        inner.collection.len()
                    }
                    FetchKind::Next => inner.collection.extend(page.items),
                };
                let has_more = next_cursor.is_some();

                inner.next_cursor = next_cursor;
                inner.next_retryable = false;
                inner.state = if has_more {
                    PaginationState::Ready
                } else {
                    PaginationState::Exhausted
                };
                let total_items = inner.collection.len();
                drop(inner);

                info!(
                    generation,
                    items_added, total_items, has_more, "Gallery page merged"
                );
                self.emit(GalleryEvent::PageLoaded {
                    generation,
                    items_added,
                    total_items,
                    has_more,
                });

                Ok(FetchOutcome::Applied {
                    items_added,
                    has_more,
                })
            }
            Err(error) => {
                let error = PaginationError::from(error);
                inner.next_retryable = kind == FetchKind::Next;
                inner.state = PaginationState::Failed(error.clone());
                drop(inner);

                warn!(generation, error = %error, "Gallery fetch failed");
                self.emit(GalleryEvent::LoadFailed {
                    message: error.to_string(),
                });

                Err(error)
            }
        }
    }

    fn emit(&self, event: GalleryEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Gallery(event)).ok();
        }
    }
}

impl CacheInvalidator for PaginationController {
    fn invalidate(&self) {
        PaginationController::invalidate(self);
    }
}
