//! queue-desk - client for a take-a-number counter-service backend
//!
//! This crate provides the client half of a queue system with features including:
//! - Claiming and releasing queue tickets through an explicit state machine
//! - Counter and admin account management
//! - A public display board refreshed by polling
//! - Uniform handling of the backend's response envelope
//!
//! The backend owns all authoritative state. The client keeps only the
//! bearer token and the ticket it holds, both in a session file.

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]

//! # Example
//!
//! ```rust,ignore
//! use queue_desk::config::Config;
//! use queue_desk::session::{Session, TracingNotifier};
//! use queue_desk::storage::FileSessionStore;
//! use queue_desk::transport::HttpTransport;
//! use std::sync::Arc;
//!
//! let config = Config::load_or_default()?;
//! let store = Arc::new(FileSessionStore::new(config.session_path()?));
//! let transport = Arc::new(HttpTransport::new(&config.api, store.clone())?);
//! let mut session = Session::open(transport, store, Arc::new(TracingNotifier), config.cache.stale_after())?;
//!
//! let ticket = session.claim().await?;
//! println!("holding {ticket}");
//! session.release(None, None).await?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod envelope;
pub mod error;
pub mod services;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use envelope::{ApiFailure, ApiOutcome, Reply};
pub use error::{QueueDeskError, Result};
