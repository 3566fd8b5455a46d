//! # Gallery API Provider
//!
//! Implements `GalleryBackend` over the gallery service's REST contract.
//!
//! ## Overview
//!
//! - `GET {base}/api/images?after=<cursor>` lists one page of images
//! - `POST {base}/api/images` registers a stored image
//!
//! Transport is any injected `HttpClient`; the connector never retries.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GalleryApiConnector;
pub use error::{GalleryApiError, Result};
