//! Error types for queue-desk
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! is [`QueueDeskError`]. Failures reported by the backend (or produced while
//! talking to it) arrive as [`ApiFailure`] and are wrapped in
//! [`QueueDeskError::Api`] so the CLI can render every failure the same way.

use crate::envelope::{ApiFailure, FailureKind};
use thiserror::Error;

/// Result type alias used throughout queue-desk
pub type Result<T> = std::result::Result<T, QueueDeskError>;

/// Main error type for queue-desk
#[derive(Error, Debug)]
pub enum QueueDeskError {
    /// I/O error while reading or writing local files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration could not be loaded
    #[error("Failed to read config: {0}")]
    Config(#[from] config::ConfigError),

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownConfigKey(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A remote operation failed (transport, server, or validation)
    #[error("{0}")]
    Api(#[from] ApiFailure),

    /// The session holds no ticket
    #[error("No ticket is currently held")]
    NoHeldTicket,

    /// The session already holds a ticket
    #[error("Queue number {queue_number} at {counter_name} is already held")]
    TicketAlreadyHeld {
        queue_number: u32,
        counter_name: String,
    },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Interactive prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// CSV output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Custom error message
    #[error("{0}")]
    Custom(String),
}

impl QueueDeskError {
    /// Create a custom error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Message suitable for showing to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(failure) => match failure.status_code {
                Some(code) if failure.kind == FailureKind::Transport => {
                    format!("{} (HTTP {code})", failure.message)
                },
                _ => failure.message.clone(),
            },
            other => other.to_string(),
        }
    }

    /// Hints that help the user recover from the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Api(failure) if failure.is_unauthorized() => vec![
                "Your session has expired; log in again with 'queue-desk login'".to_string(),
            ],
            Self::Api(failure) if failure.kind == FailureKind::Transport && failure.status_code.is_none() => vec![
                "Check that the backend is running and 'api.base_url' is correct".to_string(),
                "Run 'queue-desk config show' to inspect the active configuration".to_string(),
            ],
            Self::NoHeldTicket => vec![
                "Claim a queue number first with 'queue-desk queue claim'".to_string(),
            ],
            Self::TicketAlreadyHeld { .. } => vec![
                "Release the held number with 'queue-desk queue release' before claiming another".to_string(),
            ],
            Self::Config(_) | Self::UnknownConfigKey(_) => vec![
                "Run 'queue-desk config path' to locate the configuration file".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Whether the user can simply retry or adjust input
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Api(_)
                | Self::NoHeldTicket
                | Self::TicketAlreadyHeld { .. }
                | Self::InvalidInput(_)
        )
    }

    /// Whether the error comes from configuration
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownConfigKey(_))
    }
}
