//! # imgbb Object Store Provider
//!
//! Implements the `ObjectStore` bridge trait on top of the imgbb upload API.
//!
//! ## Overview
//!
//! - Posts image bytes base64-encoded in a form body
//! - Authenticates with an API key passed as the `key` query parameter
//! - Supports optional automatic expiry of uploaded images
//!
//! The API key never appears in logs or error messages.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::ImgbbObjectStore;
pub use error::{ImgbbError, Result};
