//! queue-desk - take-a-number counter-service client
//!
//! This is the main entry point for the queue-desk CLI application.
//! It handles command-line argument parsing and dispatches to the appropriate
//! command handlers.

use clap::Parser;
use queue_desk::cli::handlers::{
    ConfigOverrides, HandlerContext, handle_admin_command, handle_board_command, handle_config_command,
    handle_counter_command, handle_login, handle_logout, handle_queue_command,
};
use queue_desk::cli::{Cli, Commands, OutputFormatter};
use queue_desk::error::{QueueDeskError, Result};
use std::process;
use tracing_subscriber::EnvFilter;

/// Main entry point for the queue-desk CLI
///
/// Parses command-line arguments and executes the requested command.
/// Handles errors gracefully and provides helpful error messages to users.
#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Configure output formatter based on flags
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    // Execute the command and handle errors
    if let Err(e) = run(cli, &formatter).await {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Run the CLI application with the parsed arguments
///
/// # Errors
///
/// Returns any error that occurs during command execution
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let overrides = ConfigOverrides {
        config_path: cli.config,
        api_url: cli.api_url,
        api_key: cli.api_key,
    };

    dispatch_command(cli.command, &overrides, formatter).await
}

/// Logs go to stderr: `--verbose` enables debug, otherwise `RUST_LOG` decides
fn init_logging(verbose: bool) {
    let filter = if verbose {
        Some(EnvFilter::new("debug"))
    } else {
        std::env::var_os(EnvFilter::DEFAULT_ENV).map(|_| EnvFilter::from_default_env())
    };

    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn dispatch_command(command: Commands, overrides: &ConfigOverrides, formatter: &OutputFormatter) -> Result<()> {
    // Only commands that talk to the backend need a session
    let context = || HandlerContext::new(overrides, formatter.clone());

    match command {
        Commands::Config { command } => handle_config_command(command, overrides, formatter),
        Commands::Login { username, password } => handle_login(&username, password, &mut context()?).await,
        Commands::Logout => handle_logout(&mut context()?),
        Commands::Counter { command } => handle_counter_command(command, &mut context()?).await,
        Commands::Admin { command } => handle_admin_command(command, &mut context()?).await,
        Commands::Queue { command } => handle_queue_command(command, &mut context()?).await,
        Commands::Board { watch, interval } => handle_board_command(watch, interval, &mut context()?).await,
    }
}

/// Handle errors and display them to the user
///
/// This function formats errors in a user-friendly way, including:
/// - The main error message
/// - Any suggestions for fixing the error
/// - Additional context in verbose mode
fn handle_error(error: &QueueDeskError, formatter: &OutputFormatter) {
    // Display the main error message
    formatter.error(&error.user_message());

    // Display suggestions if available
    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        formatter.info("\nSuggestions:");
        for suggestion in &suggestions {
            formatter.info(&format!("  • {suggestion}"));
        }
    }

    // In JSON mode, output error as JSON
    if formatter.is_json() {
        let failure = match error {
            QueueDeskError::Api(failure) => serde_json::to_value(failure).ok(),
            _ => None,
        };
        let _ = formatter.json(&serde_json::json!({
            "status": "error",
            "error": error.user_message(),
            "error_type": format!("{error:?}"),
            "failure": failure,
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    // In verbose mode, show the full error chain
    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test that the CLI can be parsed with various commands
        let _cli = Cli::parse_from(["queue-desk", "queue", "claim"]);
        let _cli = Cli::parse_from(["queue-desk", "counter", "list", "--csv"]);
        let _cli = Cli::parse_from(["queue-desk", "board", "--watch"]);
        let _cli = Cli::parse_from(["queue-desk", "config", "set", "api.base_url", "http://q.local"]);
    }
}
