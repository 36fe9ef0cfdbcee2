//! `reqwest`-backed transport

use super::{ApiRequest, HttpMethod, RawResponse, Transport, TransportError, TransportResult};
use crate::config::ApiSettings;
use crate::envelope::body_message;
use crate::error::Result;
use crate::storage::TokenRepository;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Header carrying the API key (`APIKey`; header names are case-insensitive)
pub const API_KEY_HEADER: &str = "apikey";
/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP transport shared by every service
///
/// Carries the base URL and API key, and attaches the bearer token read
/// from the token repository on each request.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenRepository>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("tokens", &"Arc<dyn TokenRepository>")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from API settings
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenRepository>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(settings.api_key.as_deref()))
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Absolute URL for a path relative to the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn bearer_token(&self) -> Option<String> {
        match self.tokens.load_token() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "could not read stored token; sending request without it");
                None
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> TransportResult {
        let url = self.url(&request.path);
        let request_id = Uuid::new_v4();
        debug!(%request_id, method = %request.method, %url, "satellite request");

        let mut builder = self
            .client
            .request(to_method(request.method), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let error = TransportError::network(describe_send_error(&e, &self.base_url));
            warn!(%request_id, %url, reason = %error, "request failed");
            error
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            let error = TransportError::network(format!("Failed to read response: {e}")).with_status(status);
            warn!(%request_id, %url, status, reason = %error, "request failed");
            error
        })?;
        let body = parse_body(&bytes);

        if !(200..300).contains(&status) {
            let error = TransportError::status(status, body);
            let message = error.body.as_ref().and_then(body_message).unwrap_or_else(|| error.to_string());
            warn!(%request_id, %url, status, reason = %message, "request failed");
            return Err(error);
        }

        match body {
            Some(body) => Ok(RawResponse { status, body }),
            None if bytes.is_empty() => Ok(RawResponse {
                status,
                body: serde_json::Value::Null,
            }),
            None => {
                let error = TransportError::decode("Failed to decode response: body is not JSON").with_status(status);
                warn!(%request_id, %url, status, reason = %error, "request failed");
                Err(error)
            },
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Headers sent with every request; no key means no `APIKey` header
pub(crate) fn default_headers(api_key: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    match api_key.map(HeaderValue::from_str) {
        Some(Ok(value)) => {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        },
        Some(Err(_)) => warn!("API key contains characters not allowed in a header; it will not be sent"),
        None => {},
    }
    headers
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn parse_body(bytes: &[u8]) -> Option<serde_json::Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn describe_send_error(error: &reqwest::Error, base_url: &str) -> String {
    if error.is_connect() {
        format!("Cannot connect to {base_url}")
    } else if error.is_timeout() {
        format!("Request to {base_url} timed out")
    } else {
        format!("Request failed: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStore;

    #[test]
    fn test_api_key_header_only_when_configured() {
        let headers = default_headers(Some("k-123"));
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "k-123");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let headers = default_headers(None);
        assert!(headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_invalid_api_key_is_skipped() {
        let headers = default_headers(Some("bad\nkey"));
        assert!(headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_url_joining() {
        assert_eq!(join_url("http://localhost:3000/", "/api/v1/counters/"), "http://localhost:3000/api/v1/counters/");
        assert_eq!(join_url("http://localhost:3000", "api/v1/admin/3"), "http://localhost:3000/api/v1/admin/3");
    }

    #[test]
    fn test_bearer_token_is_read_per_request() {
        let store = Arc::new(MemorySessionStore::default());
        let transport = HttpTransport::new(&ApiSettings::default(), store.clone()).unwrap();
        assert_eq!(transport.bearer_token(), None);

        store.save_token("abc").unwrap();
        assert_eq!(transport.bearer_token().as_deref(), Some("abc"));

        store.save_token("").unwrap();
        assert_eq!(transport.bearer_token(), None);
    }

    #[test]
    fn test_body_parsing() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(b"<html>"), None);
        assert_eq!(parse_body(br#"{"status":true}"#), Some(serde_json::json!({ "status": true })));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_failure() {
        let settings = ApiSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            timeout_secs: 2,
            ..ApiSettings::default()
        };
        let transport = HttpTransport::new(&settings, Arc::new(MemorySessionStore::default())).unwrap();

        let error = transport
            .send(ApiRequest::new(HttpMethod::Get, "/api/v1/counters/"))
            .await
            .unwrap_err();
        assert_eq!(error.status, None);
        assert!(error.detail.is_some());
    }
}
