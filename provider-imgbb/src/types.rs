//! imgbb wire types

use serde::{Deserialize, Serialize};

/// Form body of `POST /1/upload`
#[derive(Debug, Serialize)]
pub struct UploadForm<'a> {
    /// Base64-encoded image bytes
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,

    /// Seconds until imgbb deletes the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,
}

/// Successful upload response
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub data: UploadedImage,

    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    /// Direct link to the stored image
    pub url: String,

    #[serde(default)]
    pub id: Option<String>,
}

/// Error body, e.g. `{"status_code":400,"error":{"message":"..."}}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}
