//! Response envelope handling
//!
//! Every backend endpoint answers with the same wrapper:
//!
//! ```json
//! { "status": true, "data": { ... }, "message": "...", "error": { "message": "..." } }
//! ```
//!
//! [`normalize`] folds that wrapper, and every transport failure, into an
//! [`ApiOutcome`]: either a [`Reply`] carrying a trusted payload, or an
//! [`ApiFailure`] carrying a message fit for the user. Callers never inspect
//! `status`, `data` and `error` separately.

use crate::transport::{TransportError, TransportResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shown when a failure carries nothing more specific
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// The uniform wrapper as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<Value>,
}

/// A trusted payload and the server's optional message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub data: T,
    pub message: Option<String>,
}

/// Where a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network failure, non-2xx status, or undecodable body
    Transport,
    /// The server answered with `status: false` or an `error` object
    Server,
    /// Rejected locally before any request was sent
    Validation,
}

/// A failed remote operation, whatever its origin
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiFailure {
    pub message: String,
    pub status_code: Option<u16>,
    pub kind: FailureKind,
}

impl ApiFailure {
    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
            kind: FailureKind::Transport,
        }
    }

    pub fn server(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
            kind: FailureKind::Server,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            kind: FailureKind::Validation,
        }
    }

    /// Build a failure from a transport error, preferring the server's message
    #[must_use]
    pub fn from_transport(error: &TransportError) -> Self {
        let message = error
            .body
            .as_ref()
            .and_then(body_message)
            .or_else(|| error.detail.clone())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self::transport(message, error.status)
    }

    /// The server rejected our credentials
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status_code, Some(401))
    }
}

/// Either a trusted payload or a user-facing failure
pub type ApiOutcome<T> = Result<Reply<T>, ApiFailure>;

impl<T> ApiEnvelope<T> {
    /// Apply the envelope's branch discipline: `error`, then `status`, then `data`
    pub fn into_outcome(self, fallback: &str) -> ApiOutcome<T> {
        if let Some(error) = self.error {
            let message = error_message(&error).unwrap_or_else(|| fallback.to_string());
            return Err(ApiFailure::server(message, None));
        }

        match (self.status, self.data) {
            (true, Some(data)) => Ok(Reply {
                data,
                message: self.message,
            }),
            (true, None) => Err(ApiFailure::server(fallback, None)),
            (false, _) => Err(ApiFailure::server(
                non_empty(self.message).unwrap_or_else(|| fallback.to_string()),
                None,
            )),
        }
    }
}

/// Fold one transport attempt into an [`ApiOutcome`]
pub fn normalize<T: DeserializeOwned>(result: TransportResult, fallback: &str) -> ApiOutcome<T> {
    match result {
        Ok(raw) => {
            let status = raw.status;
            let envelope: ApiEnvelope<T> = serde_json::from_value(raw.body).map_err(|e| {
                ApiFailure::transport(format!("Failed to decode response: {e}"), Some(status))
            })?;
            envelope.into_outcome(fallback)
        },
        Err(error) => Err(ApiFailure::from_transport(&error)),
    }
}

/// Extract the most specific message from a raw envelope body
#[must_use]
pub fn body_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(error_message)
        .or_else(|| non_empty(body.get("message")?.as_str().map(str::to_string)))
}

fn error_message(error: &Value) -> Option<String> {
    let message = match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    non_empty(message)
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        success: bool,
    }

    fn ok(body: Value) -> TransportResult {
        Ok(RawResponse { status: 200, body })
    }

    #[test]
    fn test_success_envelope_yields_payload() {
        let reply: Reply<Ack> = normalize(
            ok(json!({ "status": true, "data": { "success": true }, "message": "Released" })),
            "Failed to release queue",
        )
        .unwrap();
        assert_eq!(reply.data, Ack { success: true });
        assert_eq!(reply.message.as_deref(), Some("Released"));
    }

    #[test]
    fn test_error_object_wins_over_status() {
        let failure = normalize::<Ack>(
            ok(json!({ "status": true, "data": { "success": true }, "error": { "message": "Counter closed" } })),
            "Failed to release queue",
        )
        .unwrap_err();
        assert_eq!(failure.message, "Counter closed");
        assert_eq!(failure.kind, FailureKind::Server);
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let failure = normalize::<Ack>(
            ok(json!({ "status": false, "error": {} })),
            "Failed to claim queue",
        )
        .unwrap_err();
        assert_eq!(failure.message, "Failed to claim queue");
    }

    #[test]
    fn test_status_false_uses_message_then_fallback() {
        let failure = normalize::<Ack>(
            ok(json!({ "status": false, "message": "Queue is full" })),
            "Failed to claim queue",
        )
        .unwrap_err();
        assert_eq!(failure.message, "Queue is full");

        let failure = normalize::<Ack>(ok(json!({ "status": false, "message": "" })), "Failed to claim queue")
            .unwrap_err();
        assert_eq!(failure.message, "Failed to claim queue");
    }

    #[test]
    fn test_success_without_data_is_not_trusted() {
        let failure = normalize::<Ack>(ok(json!({ "status": true })), "Failed to delete counter")
            .unwrap_err();
        assert_eq!(failure.message, "Failed to delete counter");
    }

    #[test]
    fn test_undecodable_payload_is_a_transport_failure() {
        let failure = normalize::<Ack>(
            ok(json!({ "status": true, "data": { "success": "yes" } })),
            "Failed to release queue",
        )
        .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Transport);
        assert_eq!(failure.status_code, Some(200));
        assert!(failure.message.starts_with("Failed to decode response"));
    }

    #[test]
    fn test_non_2xx_with_envelope_body() {
        let error = TransportError::status(
            409,
            Some(json!({ "status": false, "error": { "message": "Queue already released" } })),
        );
        let failure = normalize::<Ack>(Err(error), "Failed to release queue").unwrap_err();
        assert_eq!(failure.message, "Queue already released");
        assert_eq!(failure.status_code, Some(409));
        assert_eq!(failure.kind, FailureKind::Transport);
    }

    #[test]
    fn test_non_2xx_without_body_uses_generic_message() {
        let failure = normalize::<Ack>(Err(TransportError::status(500, None)), "Failed").unwrap_err();
        assert_eq!(failure.message, GENERIC_ERROR_MESSAGE);
        assert_eq!(failure.status_code, Some(500));
    }

    #[test]
    fn test_network_failure_keeps_detail() {
        let failure = normalize::<Ack>(
            Err(TransportError::network("Cannot connect to http://localhost:3000")),
            "Failed",
        )
        .unwrap_err();
        assert_eq!(failure.message, "Cannot connect to http://localhost:3000");
        assert_eq!(failure.status_code, None);
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ApiFailure::transport("Unauthorized", Some(401)).is_unauthorized());
        assert!(!ApiFailure::transport("Forbidden", Some(403)).is_unauthorized());
    }

    #[test]
    fn test_body_message_accepts_string_errors() {
        assert_eq!(body_message(&json!({ "error": "Invalid token" })).as_deref(), Some("Invalid token"));
        assert_eq!(body_message(&json!({ "message": "Not found" })).as_deref(), Some("Not found"));
        assert_eq!(body_message(&json!({ "status": false })), None);
    }
}
