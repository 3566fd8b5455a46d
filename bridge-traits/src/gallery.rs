//! Gallery Backend Abstractions
//!
//! Domain records exchanged with the remote gallery service and the two remote
//! collaborators the core depends on: the listing/registration backend and the
//! object store that hosts the image bytes.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A persisted gallery image. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Server-assigned unique id
    pub id: String,
    pub title: String,
    pub description: String,
    /// Location of the image bytes in the object store
    pub url: String,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

/// One batch of records plus the opaque cursor of the following batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePage {
    pub items: Vec<ImageRecord>,
    /// `None` when no further pages exist
    pub next_cursor: Option<String>,
}

impl ImagePage {
    pub fn new(items: Vec<ImageRecord>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Check if the backend advertised another page
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Metadata submitted to register a freshly stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Remote gallery service: paginated listing and record registration.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::gallery::GalleryBackend;
///
/// async fn first_page(backend: &dyn GalleryBackend) -> Result<usize> {
///     let page = backend.list_images(None).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait GalleryBackend: Send + Sync {
    /// List one page of images. `cursor = None` requests the first page; any
    /// other value must be a cursor previously returned by this backend.
    async fn list_images(&self, cursor: Option<String>) -> Result<ImagePage>;

    /// Register metadata for an uploaded image. The server assigns `id` and
    /// `created_at`.
    async fn create_image_record(&self, image: NewImage) -> Result<ImageRecord>;
}

/// Remote object storage for image bytes.
///
/// Uploads are not idempotent: repeated calls may create distinct remote objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` and return the public URL of the stored object
    async fn upload_file(
        &self,
        data: Bytes,
        mime_type: &str,
        file_name: Option<&str>,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_next() {
        let page = ImagePage::new(Vec::new(), Some("c1".to_string()));
        assert!(page.has_next());

        let page = ImagePage::new(Vec::new(), None);
        assert!(!page.has_next());
    }

    #[test]
    fn test_new_image_serializes_wire_fields() {
        let image = NewImage {
            title: "Sunset".to_string(),
            description: "Beach".to_string(),
            url: "https://i.ibb.co/x/sunset.png".to_string(),
        };

        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["title"], "Sunset");
        assert_eq!(json["description"], "Beach");
        assert_eq!(json["url"], "https://i.ibb.co/x/sunset.png");
    }
}
