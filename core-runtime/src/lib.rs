//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the gallery core:
//! - Logging and tracing setup ([`logging`])
//! - Configuration and fail-fast validation ([`config`])
//! - Event bus for read/write path notifications ([`events`])
//!
//! Every other workspace crate depends on this one for its logging
//! conventions and event types.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
