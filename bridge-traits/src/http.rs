//! HTTP Client Abstraction
//!
//! Provides the async HTTP contract the gallery providers are written against.
//! Hosts inject a concrete transport (desktop: `bridge-desktop`).

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// HTTP methods used by the gallery providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(json));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Encode `body` as `application/x-www-form-urlencoded`
    pub fn form<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(body).map_err(|e| {
            BridgeError::OperationFailed(format!("Form serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// This trait abstracts HTTP operations to allow platform-specific implementations.
/// `execute` performs exactly one attempt and never retries: the object-store
/// upload is not idempotent, and failed gallery fetches are retried only when
/// the user asks.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest, HttpMethod};
///
/// async fn fetch_page(client: &dyn HttpClient) -> Result<bool> {
///     let request = HttpRequest::new(HttpMethod::Get, "https://gallery.example.com/api/images");
///     let response = client.execute(request).await?;
///     Ok(response.is_success())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    ///
    /// Non-2xx responses are returned as `Ok`; interpreting them is up to the caller.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct UploadForm<'a> {
        image: &'a str,
        name: Option<&'a str>,
    }

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new(HttpMethod::Get, "https://example.com")
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        assert_eq!(request.url, "https://example.com");
        assert_eq!(
            request.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert!(request.body.is_none());
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = HttpRequest::new(HttpMethod::Post, "https://example.com/api/images")
            .json(&serde_json::json!({ "title": "Sunset" }))
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        let body = request.body.unwrap();
        assert_eq!(&body[..], br#"{"title":"Sunset"}"#);
    }

    #[test]
    fn test_form_body_is_urlencoded() {
        let request = HttpRequest::new(HttpMethod::Post, "https://example.com/upload")
            .form(&UploadForm {
                image: "a+b/c=",
                name: None,
            })
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/x-www-form-urlencoded".to_string())
        );
        assert_eq!(&request.body.unwrap()[..], b"image=a%2Bb%2Fc%3D");
    }

    #[test]
    fn test_http_response_success_range() {
        let response = |status| HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        };

        assert!(response(200).is_success());
        assert!(response(201).is_success());
        assert!(!response(301).is_success());
        assert!(!response(503).is_success());
    }
}
