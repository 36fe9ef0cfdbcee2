//! Command handlers
//!
//! Each module handles one top-level command. Handlers that talk to the
//! backend receive a [`HandlerContext`]; `config` works on files only.

mod admin;
mod auth;
mod board;
mod common;
mod config;
mod counter;
mod queue;

pub use admin::handle_admin_command;
pub use auth::{handle_login, handle_logout};
pub use board::handle_board_command;
pub use common::{ConfigOverrides, HandlerContext, with_pending};
pub use config::handle_config_command;
pub use counter::{EMPTY_DASHBOARD_MESSAGE, handle_counter_command, write_csv};
pub use queue::handle_queue_command;
