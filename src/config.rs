//! Configuration for queue-desk
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. `config.yaml` in the platform config directory
//! 3. `QUEUE_DESK__<SECTION>__<KEY>` environment variables
//! 4. the `QUEUE_DESK_API_URL` / `QUEUE_DESK_API_KEY` shortcuts
//! 5. command-line flags (applied by the CLI)

use crate::error::{QueueDeskError, Result};
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "QUEUE_DESK_API_URL";
/// Environment variable overriding `api.api_key`
pub const API_KEY_ENV: &str = "QUEUE_DESK_API_KEY";

const CONFIG_FILE_NAME: &str = "config.yaml";
const SESSION_FILE_NAME: &str = "session.json";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.api_key",
    "api.timeout_secs",
    "api.connect_timeout_secs",
    "display.poll_interval_secs",
    "cache.stale_secs",
    "session.path",
];

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    /// Sent as the `APIKey` header when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl ApiSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Public display board settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub poll_interval_secs: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
        }
    }
}

impl DisplaySettings {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Query cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    pub stale_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { stale_secs: 60 }
    }
}

impl CacheSettings {
    #[must_use]
    pub const fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }
}

/// Where the session file lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "queue-desk")
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Result<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or_else(|| QueueDeskError::custom("Could not determine the configuration directory"))
    }

    /// Load from the default file and the process environment
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path` (which may be absent) and the process environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::load_with(Some(path), &vars)
    }

    /// Load from an optional file and an explicit set of environment variables
    pub fn load_with(path: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(false));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("QUEUE_DESK")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("api.base_url", vars.get(API_URL_ENV).cloned())?
            .set_override_option("api.api_key", vars.get(API_KEY_ENV).cloned())?;

        let mut loaded: Self = builder.build()?.try_deserialize()?;
        loaded.api.api_key = loaded.api.api_key.filter(|key| !key.trim().is_empty());
        tracing::debug!(base_url = %loaded.api.base_url, "configuration loaded");
        Ok(loaded)
    }

    /// Write the configuration as YAML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Read a configuration file without layering, or defaults if it is absent
    pub fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Location of the session file
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session.path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join(SESSION_FILE_NAME))
            .ok_or_else(|| QueueDeskError::custom("Could not determine the data directory"))
    }

    /// Read a single key as text
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.api_key" => self.api.api_key.clone(),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "api.connect_timeout_secs" => Some(self.api.connect_timeout_secs.to_string()),
            "display.poll_interval_secs" => Some(self.display.poll_interval_secs.to_string()),
            "cache.stale_secs" => Some(self.cache.stale_secs.to_string()),
            "session.path" => self.session.path.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }

    /// Set a single key from text
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                let value = value.trim();
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(QueueDeskError::InvalidInput(format!(
                        "api.base_url must start with http:// or https://, got '{value}'"
                    )));
                }
                self.api.base_url = value.trim_end_matches('/').to_string();
            },
            "api.api_key" => {
                self.api.api_key = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            },
            "api.timeout_secs" => self.api.timeout_secs = parse_secs(key, value)?,
            "api.connect_timeout_secs" => self.api.connect_timeout_secs = parse_secs(key, value)?,
            "display.poll_interval_secs" => self.display.poll_interval_secs = parse_secs(key, value)?,
            "cache.stale_secs" => self.cache.stale_secs = parse_secs(key, value)?,
            "session.path" => {
                self.session.path = Some(PathBuf::from(value.trim())).filter(|p| !p.as_os_str().is_empty());
            },
            other => return Err(QueueDeskError::UnknownConfigKey(other.to_string())),
        }
        Ok(())
    }

    /// A copy safe to print: the API key is masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api.api_key = copy.api.api_key.as_ref().map(|_| "********".to_string());
        copy
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| QueueDeskError::InvalidInput(format!("{key} expects a number of seconds, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_with(None, &HashMap::new()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.api_key, None);
        assert_eq!(config.display.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_then_env_layering() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "api:\n  base_url: https://queue.example.com\n  timeout_secs: 3\ndisplay:\n  poll_interval_secs: 15\n",
        )
        .unwrap();

        let config = Config::load_with(
            Some(&path),
            &vars(&[("QUEUE_DESK__DISPLAY__POLL_INTERVAL_SECS", "45")]),
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://queue.example.com");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.display.poll_interval_secs, 45);
    }

    #[test]
    fn test_shortcut_variables_win() {
        let config = Config::load_with(
            None,
            &vars(&[
                (API_URL_ENV, "https://override.example.com"),
                (API_KEY_ENV, "k-123"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.api.api_key.as_deref(), Some("k-123"));
    }

    #[test]
    fn test_blank_api_key_means_no_key() {
        let config = Config::load_with(None, &vars(&[(API_KEY_ENV, "  ")])).unwrap();
        assert_eq!(config.api.api_key, None);
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("api.base_url", "https://queue.example.com/").unwrap();
        assert_eq!(config.api.base_url, "https://queue.example.com");

        assert!(config.set("api.base_url", "queue.example.com").is_err());
        assert!(config.set("display.poll_interval_secs", "soon").is_err());
        assert!(matches!(
            config.set("api.colour", "blue"),
            Err(QueueDeskError::UnknownConfigKey(_))
        ));
    }

    #[test]
    fn test_every_key_round_trips_through_get() {
        let mut config = Config::default();
        config.set("session.path", "/tmp/queue-desk/session.json").unwrap();
        for key in CONFIG_KEYS.iter().filter(|k| **k != "api.api_key") {
            assert!(config.get(key).is_some(), "missing value for {key}");
        }
    }

    #[test]
    fn test_save_and_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.yaml");

        let mut config = Config::default();
        config.set("api.api_key", "secret").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::read_file(&path).unwrap(), config);
        assert_eq!(config.redacted().api.api_key.as_deref(), Some("********"));
    }

    #[test]
    #[serial]
    fn test_load_or_default_reads_process_environment() {
        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::set_var(API_URL_ENV, "https://from-env.example.com") };
        let config = Config::load_or_default();
        unsafe { std::env::remove_var(API_URL_ENV) };

        assert_eq!(config.unwrap().api.base_url, "https://from-env.example.com");
    }
}
