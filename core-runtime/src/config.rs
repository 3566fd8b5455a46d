//! # Core Configuration Module
//!
//! Configuration for the gallery core.
//!
//! ## Overview
//!
//! [`GalleryConfig`] is assembled with a builder and validated fail-fast: an
//! invalid URL, a missing object-store key or an out-of-range timeout is
//! reported by [`GalleryConfigBuilder::build`] before any component starts.
//!
//! ## Required Settings
//!
//! - `api_base_url` - Base URL of the gallery service (`{base}/api/images`)
//! - `ObjectStoreConfig::api_key` - Credential for the image host
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//!
//! When the `desktop-shims` feature is enabled a `ReqwestHttpClient` using
//! `request_timeout_secs` is injected if no client was provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{GalleryConfig, ObjectStoreConfig};
//!
//! let config = GalleryConfig::builder()
//!     .api_base_url("https://gallery.example.com")
//!     .object_store(ObjectStoreConfig::new("imgbb-key"))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Default imgbb upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;

const MAX_TIMEOUT_SECS: u64 = 600;
const MIN_EXPIRATION_SECS: u64 = 60;
const MAX_EXPIRATION_SECS: u64 = 15_552_000;

/// Gallery core configuration.
///
/// Build with [`GalleryConfig::builder`].
#[derive(Clone)]
pub struct GalleryConfig {
    /// Base URL of the gallery service, without the `/api/images` suffix
    pub api_base_url: String,

    pub object_store: ObjectStoreConfig,

    /// Timeout applied to listing and registration calls
    pub request_timeout_secs: u64,

    /// Timeout applied to object-store uploads
    pub upload_timeout_secs: u64,

    /// Per-subscriber event buffer
    pub event_buffer_size: usize,

    pub http_client: Arc<dyn HttpClient>,
}

impl GalleryConfig {
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// Validates every setting.
    ///
    /// This checks:
    /// - `api_base_url` is an absolute http(s) URL
    /// - the object-store settings are usable
    /// - both timeouts are between 1 and 600 seconds
    /// - the event buffer is not empty
    pub fn validate(&self) -> Result<()> {
        validate_http_url("api_base_url", &self.api_base_url)?;
        self.object_store.validate()?;
        validate_timeout("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout("upload_timeout_secs", self.upload_timeout_secs)?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("api_base_url", &self.api_base_url)
            .field("object_store", &self.object_store)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

/// Settings for the imgbb-compatible object store.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    /// Upload endpoint; the key is appended as `?key=`
    pub upload_url: String,

    /// Object-store credential. Never logged.
    pub api_key: String,

    /// Auto-delete uploaded images after this many seconds
    pub expiration_secs: Option<u64>,
}

impl ObjectStoreConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            api_key: api_key.into(),
            expiration_secs: None,
        }
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    pub fn with_expiration_secs(mut self, secs: u64) -> Self {
        self.expiration_secs = Some(secs);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_http_url("object_store.upload_url", &self.upload_url)?;

        if self.api_key.trim().is_empty() {
            return Err(Error::Config(
                "Object store API key cannot be empty".to_string(),
            ));
        }

        if let Some(secs) = self.expiration_secs {
            if !(MIN_EXPIRATION_SECS..=MAX_EXPIRATION_SECS).contains(&secs) {
                return Err(Error::Config(format!(
                    "Object store expiration must be between {} and {} seconds, got {}",
                    MIN_EXPIRATION_SECS, MAX_EXPIRATION_SECS, secs
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("upload_url", &self.upload_url)
            .field("api_key", &"[REDACTED]")
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|e| Error::Config(format!("{} is not a valid URL ({}): {}", field, value, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

fn validate_timeout(field: &str, secs: u64) -> Result<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(Error::Config(format!(
            "{} must be between 1 and {} seconds, got {}",
            field, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the gallery service and \
                 object store. Desktop: enable the 'desktop-shims' feature to use the default \
                 ReqwestHttpClient. Other hosts: inject a client with .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for [`GalleryConfig`].
#[derive(Default)]
pub struct GalleryConfigBuilder {
    api_base_url: Option<String>,
    object_store: Option<ObjectStoreConfig>,
    request_timeout_secs: Option<u64>,
    upload_timeout_secs: Option<u64>,
    event_buffer_size: Option<usize>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl GalleryConfigBuilder {
    /// Sets the gallery service base URL, e.g. `https://gallery.example.com`.
    ///
    /// A trailing slash is removed.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn object_store(mut self, config: ObjectStoreConfig) -> Self {
        self.object_store = Some(config);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn upload_timeout_secs(mut self, secs: u64) -> Self {
        self.upload_timeout_secs = Some(secs);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Injects the HTTP transport used by both providers.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when a required setting is missing or invalid
    /// - [`Error::CapabilityMissing`] when no `HttpClient` was injected and
    ///   no platform default exists
    pub fn build(self) -> Result<GalleryConfig> {
        let api_base_url = self.api_base_url.ok_or_else(|| {
            Error::Config("API base URL is required. Use .api_base_url() to set it.".to_string())
        })?;

        let object_store = self.object_store.ok_or_else(|| {
            Error::Config(
                "Object store settings are required. Use .object_store() to set them.".to_string(),
            )
        })?;

        let request_timeout_secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        validate_timeout("request_timeout_secs", request_timeout_secs)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(Duration::from_secs(request_timeout_secs))?,
        };

        let config = GalleryConfig {
            api_base_url,
            object_store,
            request_timeout_secs,
            upload_timeout_secs: self
                .upload_timeout_secs
                .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            http_client,
        };

        config.validate()?;

        Ok(config)
    }
}
