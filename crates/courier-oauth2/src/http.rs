//! HTTP transport seam.
//!
//! Grant exchanges and the request injector talk to the network only through
//! [`HttpClient`]. [`ReqwestClient`] is the production implementation; tests
//! plug in an in-memory client.

use crate::error::Result;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// An outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a `POST` request.
    #[must_use]
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a header value as text, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given status and an empty body.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Creates a response carrying a JSON body.
    #[must_use]
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut response = Self::new(status);
        response.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response.body = body.into();
        response
    }

    /// Returns true for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the media type of the body, without parameters.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        let value = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        value.split(';').next().map(str::trim)
    }

    /// Returns true if the body is declared as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(|media| {
            let media = media.to_ascii_lowercase();
            media == "application/json" || media.ends_with("+json")
        })
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Asynchronous HTTP transport.
///
/// Implementations own timeouts, retries and TLS; callers see one request
/// and one response per call.
pub trait HttpClient: Send + Sync {
    /// Sends a request and reads the whole response body.
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send {
        self.as_ref().send(request)
    }
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        // The query may carry an access token.
        tracing::trace!(
            method = %request.method,
            host = request.url.host_str().unwrap_or_default(),
            path = request.url.path(),
            "Sending request"
        );

        let response = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_content_type() {
        let response = HttpResponse::json(200, r#"{"a":1}"#);
        assert!(response.is_success());
        assert!(response.is_json());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.text(), r#"{"a":1}"#);
    }

    #[test]
    fn test_content_type_parameters() {
        let mut response = HttpResponse::new(200);
        response.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert!(response.is_json());

        response.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        assert!(response.is_json());

        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(!response.is_json());
    }

    #[test]
    fn test_missing_content_type() {
        let response = HttpResponse::new(204);
        assert!(response.is_success());
        assert!(!response.is_json());
        assert!(response.content_type().is_none());
    }

    #[test]
    fn test_status_ranges() {
        assert!(!HttpResponse::new(199).is_success());
        assert!(!HttpResponse::new(301).is_success());
        assert!(!HttpResponse::new(401).is_success());
    }

    #[test]
    fn test_request_builder() {
        let url = Url::parse("https://example.com/token").unwrap();
        let request = HttpRequest::post(url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body("hello");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header(&CONTENT_TYPE), Some("text/plain"));
        assert_eq!(request.body, b"hello");
    }
}
