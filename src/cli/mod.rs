//! Command-line interface for queue-desk
//!
//! Argument definitions live in [`commands`], the per-command logic in
//! [`handlers`] and all user-facing rendering in [`output`].

mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    AdminCommands, Cli, Commands, ConfigCommands, CounterCommands, QueueCommands,
};
pub use output::OutputFormatter;
