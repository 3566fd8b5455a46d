//! Gallery service façade and bootstrap helpers.
//!
//! This crate wires the remote collaborators (gallery backend and object
//! store) into the gallery core and hands host applications a single
//! [`GalleryCore`] handle. Desktop apps typically enable the `desktop-shims`
//! feature, which lets [`GalleryCore::from_config`] fall back to the reqwest
//! transport from `bridge-desktop`.
//!
//! ```ignore
//! use core_runtime::config::{GalleryConfig, ObjectStoreConfig};
//! use core_service::GalleryCore;
//!
//! let config = GalleryConfig::builder()
//!     .api_base_url("https://gallery.example.com")
//!     .object_store(ObjectStoreConfig::new(api_key))
//!     .build()?;
//! let core = GalleryCore::from_config(config)?;
//!
//! core.pagination().load_initial().await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::gallery::{GalleryBackend, ImageRecord, ObjectStore};
use core_gallery::{PaginationController, PreviewSelection, UploadPipeline};
use core_runtime::config::GalleryConfig;
use core_runtime::events::EventBus;
use parking_lot::Mutex;
use provider_gallery_api::GalleryApiConnector;
use provider_imgbb::ImgbbObjectStore;
use tracing::info;

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::ReqwestHttpClient;

/// Aggregated handle to the remote collaborators the core requires.
pub struct CoreDependencies {
    pub backend: Arc<dyn GalleryBackend>,
    pub object_store: Arc<dyn ObjectStore>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit handles.
    pub fn new(backend: Arc<dyn GalleryBackend>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            backend,
            object_store,
        }
    }

    /// Build the HTTP providers described by a validated configuration.
    pub fn from_config(config: &GalleryConfig) -> Self {
        let backend = GalleryApiConnector::new(config.http_client.clone(), &config.api_base_url)
            .with_timeout(config.request_timeout());

        let store_config = &config.object_store;
        let object_store = ImgbbObjectStore::new(
            config.http_client.clone(),
            &store_config.upload_url,
            &store_config.api_key,
        )
        .with_expiration(store_config.expiration_secs)
        .with_timeout(config.upload_timeout());

        Self::new(Arc::new(backend), Arc::new(object_store))
    }
}

/// Primary façade exposed to host applications.
///
/// Owns one pagination controller, one upload pipeline wired to invalidate
/// it, the preview selection and the event bus both publish to.
#[derive(Clone)]
pub struct GalleryCore {
    inner: Arc<Inner>,
}

struct Inner {
    deps: CoreDependencies,
    pagination: Arc<PaginationController>,
    uploads: UploadPipeline,
    preview: Mutex<PreviewSelection>,
    events: EventBus,
}

impl GalleryCore {
    /// Create a core from explicit dependencies.
    pub fn new(deps: CoreDependencies, events: EventBus) -> Self {
        let pagination = Arc::new(
            PaginationController::new(deps.backend.clone()).with_event_bus(events.clone()),
        );
        let uploads = UploadPipeline::new(deps.object_store.clone(), deps.backend.clone())
            .with_invalidator(pagination.clone())
            .with_event_bus(events.clone());

        Self {
            inner: Arc::new(Inner {
                deps,
                pagination,
                uploads,
                preview: Mutex::new(PreviewSelection::new()),
                events,
            }),
        }
    }

    /// Validate `config` and build the HTTP-backed core it describes.
    pub fn from_config(config: GalleryConfig) -> Result<Self> {
        config.validate()?;

        let deps = CoreDependencies::from_config(&config);
        let events = EventBus::new(config.event_buffer_size);

        info!(api_base_url = %config.api_base_url, "Gallery core initialized");
        Ok(Self::new(deps, events))
    }

    pub fn pagination(&self) -> Arc<PaginationController> {
        Arc::clone(&self.inner.pagination)
    }

    pub fn uploads(&self) -> &UploadPipeline {
        &self.inner.uploads
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn dependencies(&self) -> &CoreDependencies {
        &self.inner.deps
    }

    /// Show `record` enlarged.
    pub fn select(&self, record: ImageRecord) {
        self.inner.preview.lock().select(record);
    }

    pub fn dismiss_preview(&self) {
        self.inner.preview.lock().dismiss();
    }

    /// Show the last selected record again. Returns false if none was selected.
    pub fn reopen_preview(&self) -> bool {
        self.inner.preview.lock().reopen()
    }

    /// Snapshot of the preview: the selected record and whether it is visible.
    pub fn preview(&self) -> (Option<ImageRecord>, bool) {
        let preview = self.inner.preview.lock();
        let (record, visible) = preview.current();
        (record.cloned(), visible)
    }

    /// Link for the "open original" action while the preview is visible.
    pub fn preview_original_url(&self) -> Option<String> {
        self.inner.preview.lock().original_url().map(str::to_string)
    }
}
