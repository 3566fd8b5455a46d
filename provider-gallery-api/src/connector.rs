//! Gallery API connector implementation
//!
//! Implements the `GalleryBackend` trait over the `/api/images` endpoints.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::gallery::{GalleryBackend, ImagePage, ImageRecord, NewImage};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GalleryApiError;
use crate::types::{ApiImage, ListImagesResponse};

const IMAGES_PATH: &str = "/api/images";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body excerpt kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Gallery service connector
///
/// # Example
///
/// ```ignore
/// use provider_gallery_api::GalleryApiConnector;
/// use bridge_traits::gallery::GalleryBackend;
///
/// let connector = GalleryApiConnector::new(http_client, "https://gallery.example.com");
/// let page = connector.list_images(None).await?;
/// ```
pub struct GalleryApiConnector {
    http_client: Arc<dyn HttpClient>,

    /// Service root without trailing slash
    base_url: String,

    timeout: Duration,
}

impl GalleryApiConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn images_url(&self, cursor: Option<&str>) -> String {
        match cursor {
            Some(after) => format!(
                "{}{}?after={}",
                self.base_url,
                IMAGES_PATH,
                urlencoding::encode(after)
            ),
            None => format!("{}{}", self.base_url, IMAGES_PATH),
        }
    }

    /// Convert an API image to the domain record
    fn convert_image(image: ApiImage) -> std::result::Result<ImageRecord, GalleryApiError> {
        let created_at = DateTime::<Utc>::from_timestamp_micros(image.ts)
            .ok_or(GalleryApiError::InvalidTimestamp(image.ts))?;

        Ok(ImageRecord {
            id: image.id,
            title: image.title,
            description: image.description,
            url: image.url,
            created_at,
        })
    }

    /// Send a single request and turn non-2xx answers into `ApiError`
    async fn send(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, GalleryApiError> {
        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(status = response.status, "Gallery API request succeeded");
            return Ok(response);
        }

        let body = String::from_utf8_lossy(&response.body);
        let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        warn!(status = response.status, "Gallery API request failed");

        Err(GalleryApiError::ApiError {
            status_code: response.status,
            message,
        })
    }

    fn parse<T: serde::de::DeserializeOwned>(
        response: &HttpResponse,
    ) -> std::result::Result<T, GalleryApiError> {
        serde_json::from_slice(&response.body)
            .map_err(|e| GalleryApiError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GalleryBackend for GalleryApiConnector {
    #[instrument(skip(self), fields(has_cursor = cursor.is_some()))]
    async fn list_images(&self, cursor: Option<String>) -> Result<ImagePage> {
        let url = self.images_url(cursor.as_deref());
        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.send(request).await?;
        let body: ListImagesResponse = Self::parse(&response)?;
        let next_cursor = body.next_cursor();

        let items = body
            .data
            .into_iter()
            .map(Self::convert_image)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(
            count = items.len(),
            has_next = next_cursor.is_some(),
            "Listed gallery images"
        );

        Ok(ImagePage::new(items, next_cursor))
    }

    #[instrument(skip(self, image), fields(title = %image.title))]
    async fn create_image_record(&self, image: NewImage) -> Result<ImageRecord> {
        let request = HttpRequest::new(HttpMethod::Post, self.images_url(None))
            .header("Accept", "application/json")
            .json(&image)?
            .timeout(self.timeout);

        let response = self.send(request).await?;
        let created: ApiImage = Self::parse(&response)?;
        let record = Self::convert_image(created)?;

        info!(image_id = %record.id, "Registered gallery image");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn json_response(status: u16, body: &'static str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
        })
    }

    const PAGE_BODY: &str = r#"{
        "data": [
            {"id": "1", "title": "Doge", "description": "Wow", "url": "https://i.ibb.co/a/doge.jpg", "ts": 1620222828340000},
            {"id": "2", "title": "Cat", "description": "Meow", "url": "https://i.ibb.co/b/cat.jpg", "ts": 1620222828350000}
        ],
        "after": "2"
    }"#;

    #[tokio::test]
    async fn test_list_first_page() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url == "https://gallery.example.com/api/images"
                    && req.timeout == Some(DEFAULT_TIMEOUT)
            })
            .times(1)
            .returning(|_| json_response(200, PAGE_BODY));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com/");
        let page = connector.list_images(None).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[1].title, "Cat");
        assert_eq!(page.items[0].created_at.timestamp(), 1_620_222_828);
        assert_eq!(page.next_cursor, Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_list_with_cursor_encodes_after() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url == "https://gallery.example.com/api/images?after=a%2Bb%2F%3D")
            .times(1)
            .returning(|_| json_response(200, r#"{"data": [], "after": null}"#));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let page = connector.list_images(Some("a+b/=".to_string())).await.unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_list_server_error_is_rejected_with_status() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| json_response(500, "boom"));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let err = connector.list_images(None).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_list_malformed_body_is_parse_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| json_response(200, r#"{"items": []}"#));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let err = connector.list_images(None).await.unwrap_err();

        assert!(matches!(err, BridgeError::OperationFailed(m) if m.contains("Parse error")));
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Err(BridgeError::OperationFailed("Request timed out".to_string())));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let err = connector.list_images(None).await.unwrap_err();

        assert_eq!(err.to_string(), "Bridge operation failed: Request timed out");
    }

    #[tokio::test]
    async fn test_create_image_record_posts_json() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                let body: serde_json::Value =
                    serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
                req.method == HttpMethod::Post
                    && req.url == "https://gallery.example.com/api/images"
                    && req.headers.get("Content-Type").map(String::as_str)
                        == Some("application/json")
                    && body["title"] == "Sunset"
                    && body["description"] == "Beach"
                    && body["url"] == "https://i.ibb.co/x/sunset.png"
            })
            .times(1)
            .returning(|_| {
                json_response(
                    201,
                    r#"{"id": "99", "title": "Sunset", "description": "Beach", "url": "https://i.ibb.co/x/sunset.png", "ts": 1700000000000000}"#,
                )
            });

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let record = connector
            .create_image_record(NewImage {
                title: "Sunset".to_string(),
                description: "Beach".to_string(),
                url: "https://i.ibb.co/x/sunset.png".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(record.id, "99");
        assert_eq!(record.created_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_create_image_record_client_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| json_response(400, r#"{"error": "title required"}"#));

        let connector = GalleryApiConnector::new(Arc::new(mock_http), "https://gallery.example.com");
        let err = connector
            .create_image_record(NewImage {
                title: String::new(),
                description: "x".to_string(),
                url: "https://i.ibb.co/x.png".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::Rejected { status: 400, ref message } if message.contains("title required")
        ));
    }

    #[test]
    fn test_convert_rejects_out_of_range_timestamp() {
        let result = GalleryApiConnector::convert_image(ApiImage {
            id: "1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            url: "u".to_string(),
            ts: i64::MAX,
        });
        assert!(matches!(result, Err(GalleryApiError::InvalidTimestamp(_))));
    }
}
