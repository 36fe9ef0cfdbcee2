//! Per-resource service functions
//!
//! Each function issues exactly one request through a [`Transport`] and
//! folds the answer into an [`ApiOutcome`](crate::envelope::ApiOutcome)
//! using an operation-specific fallback message. Services are stateless:
//! caching, notifications and the held ticket live in
//! [`Session`](crate::session::Session).
//!
//! [`Transport`]: crate::transport::Transport

pub mod admin;
pub mod counter;
pub mod queue;

/// Login endpoint
pub const AUTH_LOGIN_PATH: &str = "/api/v1/auth/login";
/// Admin collection
pub const ADMIN_BASE_PATH: &str = "/api/v1/admin";
/// Counter collection
pub const COUNTER_BASE_PATH: &str = "/api/v1/counters";
/// Queue operations
pub const QUEUE_BASE_PATH: &str = "/api/v1/queues";

pub(crate) fn collection_path(base: &str) -> String {
    format!("{base}/")
}

pub(crate) fn item_path(base: &str, id: u64) -> String {
    format!("{base}/{id}")
}

pub(crate) fn action_path(base: &str, action: &str) -> String {
    format!("{base}/{action}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(collection_path(COUNTER_BASE_PATH), "/api/v1/counters/");
        assert_eq!(item_path(ADMIN_BASE_PATH, 7), "/api/v1/admin/7");
        assert_eq!(action_path(QUEUE_BASE_PATH, "claim"), "/api/v1/queues/claim");
    }
}
