use super::repository::{HeldTicketRepository, TokenRepository};
use crate::core::ClaimedTicket;
use crate::error::Result;
use std::sync::{Mutex, PoisonError};

/// In-process session state, lost when the process exits
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
    held: Mutex<Option<ClaimedTicket>>,
}

impl MemorySessionStore {
    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
            held: Mutex::new(None),
        }
    }
}

impl TokenRepository for MemorySessionStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

impl HeldTicketRepository for MemorySessionStore {
    fn load_held(&self) -> Result<Option<ClaimedTicket>> {
        Ok(self.held.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save_held(&self, ticket: &ClaimedTicket) -> Result<()> {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = Some(ticket.clone());
        Ok(())
    }

    fn clear_held(&self) -> Result<()> {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
