//! # Gallery Core
//!
//! The read and write paths of the image gallery.
//!
//! - [`PaginationController`] owns the de-duplicated [`GalleryCollection`] and
//!   fetches it page by page with the backend's opaque cursors.
//! - [`UploadPipeline`] validates an [`UploadDraft`], stores the file in the
//!   object store, registers its metadata and invalidates the controller.
//! - [`PreviewSelection`] tracks the single image shown enlarged.
//!
//! Remote collaborators are reached only through the `GalleryBackend` and
//! `ObjectStore` traits from `bridge-traits`.
//!
//! ```ignore
//! use core_gallery::{PaginationController, UploadPipeline, UploadDraft, DraftFile};
//! use std::sync::Arc;
//!
//! let controller = Arc::new(PaginationController::new(backend.clone()));
//! let pipeline = UploadPipeline::new(object_store, backend)
//!     .with_invalidator(controller.clone());
//!
//! controller.load_initial().await?;
//! let draft = UploadDraft::new(DraftFile::new(bytes, "image/png"), "Sunset", "Beach");
//! pipeline.submit(&draft).await?;
//! assert!(controller.current_view().items.is_empty()); // refetch on next read
//! ```

pub mod collection;
pub mod error;
pub mod pagination;
pub mod selection;
pub mod upload;
pub mod validation;

pub use collection::GalleryCollection;
pub use error::{FieldViolation, PaginationError, UploadError, ValidationErrors};
pub use pagination::{
    CacheInvalidator, FetchOutcome, GalleryView, PaginationController, PaginationState,
};
pub use selection::PreviewSelection;
pub use upload::{UploadPipeline, UploadState};
pub use validation::{validate_draft, DraftFile, UploadDraft};
