use crate::core::ClaimedTicket;
use crate::error::Result;

/// Repository trait for the persisted bearer token
///
/// The transport reads the token before every request, so implementations
/// must be cheap to query.
pub trait TokenRepository: Send + Sync {
    /// Loads the stored token, if any
    fn load_token(&self) -> Result<Option<String>>;

    /// Stores a token, replacing any previous one
    fn save_token(&self, token: &str) -> Result<()>;

    /// Forgets the stored token
    fn clear_token(&self) -> Result<()>;
}

/// Repository trait for the ticket held by this session
pub trait HeldTicketRepository: Send + Sync {
    /// Loads the held ticket, if any
    fn load_held(&self) -> Result<Option<ClaimedTicket>>;

    /// Records the held ticket
    fn save_held(&self, ticket: &ClaimedTicket) -> Result<()>;

    /// Forgets the held ticket
    fn clear_held(&self) -> Result<()>;
}

/// Combined repository trait
pub trait SessionRepository: TokenRepository + HeldTicketRepository {}

/// Implementation of `SessionRepository` for types that implement both traits
impl<T> SessionRepository for T where T: TokenRepository + HeldTicketRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileSessionStore, MemorySessionStore};
    use crate::test_utils::sample_ticket;
    use tempfile::TempDir;

    fn exercise_tokens(store: &dyn SessionRepository) {
        assert!(store.load_token().expect("Failed to load token").is_none());

        store.save_token("first").expect("Failed to save token");
        store.save_token("second").expect("Failed to save token");
        assert_eq!(
            store.load_token().expect("Failed to load token").as_deref(),
            Some("second")
        );

        store.clear_token().expect("Failed to clear token");
        assert!(store.load_token().expect("Failed to load token").is_none());
    }

    fn exercise_held(store: &dyn SessionRepository) {
        assert!(store.load_held().expect("Failed to load ticket").is_none());

        let ticket = sample_ticket();
        store.save_held(&ticket).expect("Failed to save ticket");
        assert_eq!(
            store.load_held().expect("Failed to load ticket"),
            Some(ticket)
        );

        store.clear_held().expect("Failed to clear ticket");
        assert!(store.load_held().expect("Failed to load ticket").is_none());
    }

    #[test]
    fn test_memory_store_tokens() {
        exercise_tokens(&MemorySessionStore::default());
    }

    #[test]
    fn test_memory_store_held_ticket() {
        exercise_held(&MemorySessionStore::default());
    }

    #[test]
    fn test_file_store_tokens() {
        let temp_dir = TempDir::new().unwrap();
        exercise_tokens(&FileSessionStore::new(temp_dir.path().join("session.json")));
    }

    #[test]
    fn test_file_store_held_ticket() {
        let temp_dir = TempDir::new().unwrap();
        exercise_held(&FileSessionStore::new(temp_dir.path().join("session.json")));
    }

    #[test]
    fn test_token_and_ticket_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));

        store.save_token("secret").expect("Failed to save token");
        store.save_held(&sample_ticket()).expect("Failed to save ticket");
        store.clear_token().expect("Failed to clear token");

        assert!(store.load_held().expect("Failed to load ticket").is_some());
    }
}
