//! Public display board
//!
//! Shows the number currently served at every active counter, refreshed
//! by polling the current-queues list.

mod board;
mod poller;

pub use board::{BoardEntry, BoardSnapshot, EMPTY_BOARD_MESSAGE};
pub use poller::{BoardPoller, DEFAULT_POLL_INTERVAL, PollHandle};
