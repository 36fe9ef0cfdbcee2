//! Output formatting for the CLI
//!
//! Human-readable messages are colored unless `--no-color` is given. In
//! JSON mode stdout carries only JSON documents; informational text is
//! suppressed and warnings and errors go to stderr.

use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Shown while a mutation is in flight
pub const PENDING_MESSAGE: &str = "Processing request...";

/// Formats command results for the terminal or as JSON
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    /// Create a formatter
    #[must_use]
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    /// Whether JSON output was requested
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{} {message}", "✓".green().bold());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", "!".yellow().bold());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "✗".red().bold());
    }

    /// Print a header line
    pub fn heading(&self, title: &str) {
        if !self.json {
            println!("{}", title.bold().underline());
        }
    }

    /// Print a `label: value` line with the label dimmed
    pub fn field(&self, label: &str, value: &str) {
        if !self.json {
            println!("  {:<16} {value}", format!("{label}:").dimmed());
        }
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a JSON value
    pub fn json(&self, value: &serde_json::Value) -> Result<()> {
        self.print_json(value)
    }

    /// Spinner shown while a request is in flight; hidden in JSON mode
    #[must_use]
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}
