//! Error types for the gallery API provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Gallery API provider errors
#[derive(Error, Debug)]
pub enum GalleryApiError {
    /// The service answered with a non-2xx status
    #[error("Gallery API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Record timestamp outside the representable range
    #[error("Invalid record timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for gallery API operations
pub type Result<T> = std::result::Result<T, GalleryApiError>;

impl From<GalleryApiError> for BridgeError {
    fn from(error: GalleryApiError) -> Self {
        match error {
            GalleryApiError::ApiError {
                status_code,
                message,
            } => BridgeError::Rejected {
                status: status_code,
                message,
            },
            GalleryApiError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            GalleryApiError::InvalidTimestamp(ts) => {
                BridgeError::OperationFailed(format!("Invalid record timestamp: {}", ts))
            }
            GalleryApiError::BridgeError(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GalleryApiError::ApiError {
            status_code: 404,
            message: "Not found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Gallery API error (status 404): Not found"
        );
    }

    #[test]
    fn test_api_error_keeps_status_in_bridge_error() {
        let bridge_error: BridgeError = GalleryApiError::ApiError {
            status_code: 503,
            message: "unavailable".to_string(),
        }
        .into();

        assert_eq!(bridge_error.status(), Some(503));
    }

    #[test]
    fn test_transport_error_passes_through() {
        let bridge_error: BridgeError =
            GalleryApiError::from(BridgeError::OperationFailed("Request timed out".into())).into();

        assert!(matches!(bridge_error, BridgeError::OperationFailed(m) if m == "Request timed out"));
    }
}
