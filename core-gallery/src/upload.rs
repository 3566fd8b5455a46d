//! # Upload Pipeline
//!
//! Turns an [`UploadDraft`] into a registered [`ImageRecord`].
//!
//! ```text
//! Editing → Validating → Uploading → RegisteringMetadata → Succeeded
//!               │            │                │
//!               └────────────┴────────────────┴──────────→ Failed
//! ```
//!
//! - Validation is local and reports every violated rule at once.
//! - An object-store failure ends the attempt before the backend is called.
//! - A registration failure reports the URL of the stored but unregistered
//!   file. Nothing is cleaned up automatically.
//! - On success the gallery cache is invalidated before the state becomes
//!   `Succeeded`, so the next read refetches from the first page.
//!
//! Every resubmission starts over at validation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_traits::{GalleryBackend, ImageRecord, NewImage, ObjectStore};
use core_runtime::events::{CoreEvent, EventBus, UploadEvent};
use core_runtime::logging::strip_path;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::{FieldViolation, UploadError, ValidationErrors};
use crate::pagination::CacheInvalidator;
use crate::validation::{validate_draft, DraftFile, UploadDraft};

/// Write-path state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Editing,
    Validating,
    Uploading,
    RegisteringMetadata,
    Succeeded(ImageRecord),
    Failed(UploadError),
}

impl UploadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadState::Editing => "editing",
            UploadState::Validating => "validating",
            UploadState::Uploading => "uploading",
            UploadState::RegisteringMetadata => "registering_metadata",
            UploadState::Succeeded(_) => "succeeded",
            UploadState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded(_) | UploadState::Failed(_))
    }

    /// Between validation and a terminal state
    pub fn is_submitting(&self) -> bool {
        matches!(
            self,
            UploadState::Validating | UploadState::Uploading | UploadState::RegisteringMetadata
        )
    }
}

/// Ends a submission: clears the in-flight flag and, when the submit future
/// was dropped before reaching a terminal state, returns to `Editing`.
struct SubmitGuard<'a> {
    in_flight: &'a AtomicBool,
    state_tx: &'a watch::Sender<UploadState>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let abandoned = self.state_tx.send_if_modified(|state| {
            if state.is_submitting() {
                *state = UploadState::Editing;
                true
            } else {
                false
            }
        });
        if abandoned {
            debug!("Submission abandoned before completion");
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Validates, stores and registers new gallery images.
pub struct UploadPipeline {
    object_store: Arc<dyn ObjectStore>,
    backend: Arc<dyn GalleryBackend>,
    invalidator: Option<Arc<dyn CacheInvalidator>>,
    event_bus: Option<EventBus>,
    state_tx: watch::Sender<UploadState>,
    in_flight: AtomicBool,
}

impl UploadPipeline {
    pub fn new(object_store: Arc<dyn ObjectStore>, backend: Arc<dyn GalleryBackend>) -> Self {
        let (state_tx, _) = watch::channel(UploadState::Editing);
        Self {
            object_store,
            backend,
            invalidator: None,
            event_bus: None,
            state_tx,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Invalidate `invalidator` after every successful registration
    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = Some(invalidator);
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn state(&self) -> UploadState {
        self.state_tx.borrow().clone()
    }

    /// Watch every state transition
    pub fn subscribe_state(&self) -> watch::Receiver<UploadState> {
        self.state_tx.subscribe()
    }

    /// Return to `Editing` after a terminal state. Ignored while a submission
    /// is running.
    pub fn reset(&self) {
        if self.in_flight.load(Ordering::Acquire) {
            return;
        }
        self.transition(UploadState::Editing);
    }

    /// Run one submission attempt to a terminal state.
    ///
    /// The draft is only borrowed, so the caller still has it after a
    /// failure. A second call while one is running is rejected with
    /// [`UploadError::InProgress`] and does not disturb the first.
    ///
    /// Dropping the returned future before it completes puts the pipeline
    /// back in `Editing`. A file already stored by then is not cleaned up.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn submit(&self, draft: &UploadDraft) -> Result<ImageRecord, UploadError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit rejected: upload already in progress");
            return Err(UploadError::InProgress);
        }
        let _guard = SubmitGuard {
            in_flight: &self.in_flight,
            state_tx: &self.state_tx,
        };

        self.transition(UploadState::Validating);
        let file = match self.validate(draft) {
            Ok(file) => file,
            Err(violations) => {
                warn!(violations = %violations, "Upload draft rejected");
                self.emit(UploadEvent::Rejected {
                    violations: violations
                        .violations()
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                });
                return Err(self.fail(UploadError::Validation(violations)));
            }
        };

        self.transition(UploadState::Uploading);
        self.emit(UploadEvent::Started);
        debug!(
            mime_type = %file.mime_type,
            size = file.size(),
            file = file.name.as_deref().map(strip_path).unwrap_or("-"),
            "Storing image file"
        );

        let url = match self
            .object_store
            .upload_file(file.data.clone(), &file.mime_type, file.name.as_deref())
            .await
        {
            Ok(url) if url.trim().is_empty() => {
                return Err(self.fail(UploadError::Upload {
                    message: "object store returned an empty url".to_string(),
                }));
            }
            Ok(url) => url,
            Err(e) => {
                return Err(self.fail(UploadError::Upload {
                    message: e.to_string(),
                }));
            }
        };

        self.emit(UploadEvent::FileStored { url: url.clone() });
        self.transition(UploadState::RegisteringMetadata);

        let new_image = NewImage {
            title: draft.title.clone(),
            description: draft.description.clone(),
            url: url.clone(),
        };

        let record = match self.backend.create_image_record(new_image).await {
            Ok(record) => record,
            Err(e) => {
                return Err(self.fail(UploadError::Registration {
                    message: e.to_string(),
                    orphaned_url: url,
                }));
            }
        };

        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate();
        }

        info!(image_id = %record.id, "Image registered");
        self.emit(UploadEvent::Succeeded {
            image_id: record.id.clone(),
            title: record.title.clone(),
        });
        self.transition(UploadState::Succeeded(record.clone()));

        Ok(record)
    }

    fn validate<'d>(&self, draft: &'d UploadDraft) -> Result<&'d DraftFile, ValidationErrors> {
        validate_draft(draft)?;
        draft
            .file
            .as_ref()
            .ok_or_else(|| ValidationErrors::new(vec![FieldViolation::FileRequired]))
    }

    fn fail(&self, error: UploadError) -> UploadError {
        if !matches!(error, UploadError::Validation(_)) {
            warn!(
                stage = error.stage(),
                error = %error,
                "Upload failed"
            );
            self.emit(UploadEvent::Failed {
                stage: error.stage().to_string(),
                message: error.to_string(),
                orphaned_url: error.orphaned_url().map(str::to_string),
            });
        }
        self.transition(UploadState::Failed(error.clone()));
        error
    }

    fn transition(&self, next: UploadState) {
        debug!(state = next.as_str(), "Upload state changed");
        self.state_tx.send_replace(next);
    }

    fn emit(&self, event: UploadEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Upload(event)).ok();
        }
    }
}
