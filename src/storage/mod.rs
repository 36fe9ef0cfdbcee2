//! Client-side persisted state
//!
//! The backend owns every counter and ticket. The only things the client
//! keeps between runs are the bearer token and the ticket this session
//! holds, both stored through the repository traits defined here.

mod file;
mod memory;
mod repository;

pub use file::{FileSessionStore, SessionFile};
pub use memory::MemorySessionStore;
pub use repository::{HeldTicketRepository, SessionRepository, TokenRepository};
