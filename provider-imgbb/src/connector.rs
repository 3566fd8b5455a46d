//! imgbb upload connector

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use bridge_traits::error::Result;
use bridge_traits::gallery::ObjectStore;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::logging::{redact_url_query, strip_path};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::ImgbbError;
use crate::types::{ErrorResponse, UploadForm, UploadResponse};

/// Default upload timeout; image bodies are large compared to API calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Object store backed by imgbb
///
/// # Example
///
/// ```ignore
/// use provider_imgbb::ImgbbObjectStore;
///
/// let store = ImgbbObjectStore::new(http_client, "https://api.imgbb.com/1/upload", api_key)
///     .with_expiration(Some(600));
/// let url = store.upload_file(bytes, "image/png", Some("sunset.png")).await?;
/// ```
pub struct ImgbbObjectStore {
    http_client: Arc<dyn HttpClient>,
    upload_url: String,
    api_key: String,
    expiration_secs: Option<u64>,
    timeout: Duration,
}

impl ImgbbObjectStore {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        upload_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            upload_url: upload_url.into(),
            api_key: api_key.into(),
            expiration_secs: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_expiration(mut self, expiration_secs: Option<u64>) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_url(&self) -> String {
        let separator = if self.upload_url.contains('?') { '&' } else { '?' };
        format!("{}{}key={}", self.upload_url, separator, self.api_key)
    }

    fn error_message(response: &HttpResponse) -> String {
        match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(ErrorResponse {
                error: Some(detail),
            }) => detail.message,
            _ => String::from_utf8_lossy(&response.body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect(),
        }
    }

    async fn upload(
        &self,
        data: Bytes,
        name: Option<&str>,
    ) -> std::result::Result<String, ImgbbError> {
        let form = UploadForm {
            image: STANDARD.encode(&data),
            name,
            expiration: self.expiration_secs,
        };
        let url = self.request_url();
        debug!(url = %redact_url_query(&url), "Posting image to imgbb");

        let request = HttpRequest::new(HttpMethod::Post, url)
            .header("Accept", "application/json")
            .form(&form)?
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            let message = Self::error_message(&response);
            warn!(status = response.status, "imgbb upload failed");
            return Err(ImgbbError::ApiError {
                status_code: response.status,
                message,
            });
        }

        let body: UploadResponse = serde_json::from_slice(&response.body)
            .map_err(|e| ImgbbError::ParseError(e.to_string()))?;

        if !body.success {
            warn!("imgbb reported an unsuccessful upload");
            return Err(ImgbbError::UploadRejected);
        }

        Ok(body.data.url)
    }
}

/// Name sent to imgbb: the file name without directories or extension
fn display_name(file_name: &str) -> &str {
    let base = strip_path(file_name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

#[async_trait]
impl ObjectStore for ImgbbObjectStore {
    #[instrument(skip(self, data, file_name), fields(size = data.len()))]
    async fn upload_file(
        &self,
        data: Bytes,
        mime_type: &str,
        file_name: Option<&str>,
    ) -> Result<String> {
        let name = file_name.map(display_name).filter(|n| !n.is_empty());
        let url = self.upload(data, name).await?;

        info!(url = %url, "Stored image in imgbb");
        Ok(url)
    }
}
