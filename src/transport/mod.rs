//! Transport layer
//!
//! A single [`Transport`] carries every request to the backend. It performs
//! exactly one attempt per call: failures are logged and handed back to the
//! caller unchanged, never retried. Services speak to the backend through
//! the verb helpers on [`TransportExt`], which every transport gets for free.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A request addressed relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request without query or body
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append query parameters
    #[must_use]
    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query.extend(
            query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        self
    }

    /// Attach a JSON body; `null` is treated as no body
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, TransportError> {
        let value = serde_json::to_value(body).map_err(|e| {
            TransportError::decode(format!("Failed to encode request body: {e}"))
        })?;
        self.body = (!value.is_null()).then_some(value);
        Ok(self)
    }
}

/// A successful (2xx) response with its decoded JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

/// A request that did not produce a 2xx response
///
/// `status` is set when the server answered; `body` keeps whatever JSON it
/// sent so the envelope layer can extract the server's message. `detail`
/// describes failures that never reached the server or could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub detail: Option<String>,
}

impl TransportError {
    /// The server answered with a non-2xx status
    #[must_use]
    pub const fn status(status: u16, body: Option<Value>) -> Self {
        Self {
            status: Some(status),
            body,
            detail: None,
        }
    }

    /// The request never got an answer
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            detail: Some(detail.into()),
        }
    }

    /// A body could not be encoded or decoded
    pub fn decode(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            detail: Some(detail.into()),
        }
    }

    /// Attach the status code of the response being decoded
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.detail, self.status) {
            (Some(detail), _) => f.write_str(detail),
            (None, Some(status)) => write!(f, "request failed with status {status}"),
            (None, None) => f.write_str("request failed"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Result of a single transport attempt
pub type TransportResult = Result<RawResponse, TransportError>;

/// Sends requests to the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request, making exactly one attempt
    async fn send(&self, request: ApiRequest) -> TransportResult;
}

/// Verb helpers available on every [`Transport`]
#[async_trait]
pub trait TransportExt: Transport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> TransportResult {
        self.send(ApiRequest::new(HttpMethod::Get, path).with_query(query))
            .await
    }

    async fn post<B>(&self, path: &str, body: &B) -> TransportResult
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = ApiRequest::new(HttpMethod::Post, path).with_json(body)?;
        self.send(request).await
    }

    async fn put<B>(&self, path: &str, body: &B) -> TransportResult
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = ApiRequest::new(HttpMethod::Put, path).with_json(body)?;
        self.send(request).await
    }

    async fn patch(&self, path: &str) -> TransportResult {
        self.send(ApiRequest::new(HttpMethod::Patch, path)).await
    }

    async fn delete(&self, path: &str) -> TransportResult {
        self.send(ApiRequest::new(HttpMethod::Delete, path)).await
    }
}

impl<T: Transport + ?Sized> TransportExt for T {}
