//! Error types for the imgbb provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgbbError {
    /// Non-2xx answer from the upload endpoint
    #[error("imgbb API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// 2xx answer whose body reports `success: false`
    #[error("imgbb rejected the upload")]
    UploadRejected,

    #[error("Failed to parse imgbb response: {0}")]
    ParseError(String),

    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, ImgbbError>;

impl From<ImgbbError> for BridgeError {
    fn from(error: ImgbbError) -> Self {
        match error {
            ImgbbError::ApiError {
                status_code,
                message,
            } => BridgeError::Rejected {
                status: status_code,
                message,
            },
            ImgbbError::UploadRejected => {
                BridgeError::OperationFailed("imgbb rejected the upload".to_string())
            }
            ImgbbError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            ImgbbError::BridgeError(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_rejected() {
        let bridge_error: BridgeError = ImgbbError::ApiError {
            status_code: 400,
            message: "Invalid API v1 key.".to_string(),
        }
        .into();

        assert_eq!(bridge_error.status(), Some(400));
        assert!(bridge_error.to_string().contains("Invalid API v1 key."));
    }

    #[test]
    fn test_upload_rejected_has_no_status() {
        let bridge_error: BridgeError = ImgbbError::UploadRejected.into();
        assert_eq!(bridge_error.status(), None);
    }
}
