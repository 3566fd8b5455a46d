use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the host can fix this by changing configuration or injecting a bridge
    pub fn is_configuration_issue(&self) -> bool {
        matches!(self, Error::Config(_) | Error::CapabilityMissing { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
