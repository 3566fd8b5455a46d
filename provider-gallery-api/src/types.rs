//! Gallery API wire types
//!
//! Data structures for the `/api/images` JSON bodies.

use serde::{Deserialize, Serialize};

/// One image as returned by the listing and registration endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiImage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,

    /// Creation time in microseconds since the Unix epoch
    pub ts: i64,
}

/// `GET /api/images` response
#[derive(Debug, Deserialize)]
pub struct ListImagesResponse {
    pub data: Vec<ApiImage>,

    /// Cursor of the following page; `null`, absent or empty when exhausted
    #[serde(default)]
    pub after: Option<String>,
}

impl ListImagesResponse {
    pub fn next_cursor(&self) -> Option<String> {
        self.after.clone().filter(|cursor| !cursor.is_empty())
    }
}
