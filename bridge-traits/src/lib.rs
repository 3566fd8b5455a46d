//! # Host Bridge Traits
//!
//! Contracts between the gallery core and the outside world.
//!
//! ## Overview
//!
//! This crate defines every capability the core consumes but does not own:
//! transport, the remote gallery service, the remote object store, and the
//! host's log sink. Concrete adapters live in other crates
//! (`bridge-desktop`, `provider-gallery-api`, `provider-imgbb`) or in tests.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-attempt async HTTP transport
//!
//! ### Gallery
//! - [`GalleryBackend`](gallery::GalleryBackend) - Cursor-paginated listing and record registration
//! - [`ObjectStore`](gallery::ObjectStore) - Image byte storage returning a public URL
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations should:
//!
//! - Convert transport/provider errors to `BridgeError`
//! - Report non-2xx answers as `BridgeError::Rejected` with the status code
//! - Never include credentials in error messages
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` across async tasks.

pub mod error;
pub mod gallery;
pub mod http;
pub mod log;

pub use error::BridgeError;

// Re-export commonly used types
pub use gallery::{GalleryBackend, ImagePage, ImageRecord, NewImage, ObjectStore};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use log::{LogEntry, LogLevel, LoggerSink};
