//! Handlers for the `config` subcommands

use super::common::ConfigOverrides;
use crate::cli::ConfigCommands;
use crate::cli::output::OutputFormatter;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::{QueueDeskError, Result};

/// Dispatch a `config` subcommand
///
/// These never contact the backend.
pub fn handle_config_command(
    command: ConfigCommands,
    overrides: &ConfigOverrides,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        ConfigCommands::Show { key } => handle_show(key.as_deref(), overrides, formatter),
        ConfigCommands::Set { key, value } => handle_set(&key, &value, overrides, formatter),
        ConfigCommands::Path => {
            let path = overrides.config_path()?;
            if formatter.is_json() {
                formatter.print_json(&serde_json::json!({
                    "path": path,
                    "exists": path.exists(),
                }))
            } else {
                formatter.info(&path.display().to_string());
                Ok(())
            }
        },
    }
}

fn handle_show(key: Option<&str>, overrides: &ConfigOverrides, formatter: &OutputFormatter) -> Result<()> {
    let config = overrides.load()?.redacted();

    if let Some(key) = key {
        if !CONFIG_KEYS.contains(&key) {
            return Err(QueueDeskError::UnknownConfigKey(key.to_string()));
        }
        let value = config.get(key);
        if formatter.is_json() {
            return formatter.print_json(&serde_json::json!({ "key": key, "value": value }));
        }
        formatter.info(value.as_deref().unwrap_or("(not set)"));
        return Ok(());
    }

    if formatter.is_json() {
        let mut shown = serde_json::to_value(&config)?;
        shown["session"]["path"] = serde_json::json!(config.session_path()?);
        return formatter.print_json(&shown);
    }
    formatter.info(serde_yaml::to_string(&config)?.trim_end());
    formatter.info(&format!("# session file: {}", config.session_path()?.display()));
    Ok(())
}

fn handle_set(key: &str, value: &str, overrides: &ConfigOverrides, formatter: &OutputFormatter) -> Result<()> {
    let path = overrides.config_path()?;
    let mut config = Config::read_file(&path)?;
    config.set(key, value)?;
    config.save_to(&path)?;

    let shown = config.redacted().get(key).unwrap_or_default();
    if formatter.is_json() {
        formatter.print_json(&serde_json::json!({ "status": "success", "key": key, "value": shown }))
    } else {
        formatter.success(&format!("Set {key} = {shown}"));
        Ok(())
    }
}
