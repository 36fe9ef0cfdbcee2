use crate::cli::output::{OutputFormatter, PENDING_MESSAGE};
use crate::config::Config;
use crate::error::Result;
use crate::session::{RecordingNotifier, Session};
use crate::storage::{FileSessionStore, TokenRepository};
use crate::transport::HttpTransport;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration sources chosen on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

impl ConfigOverrides {
    /// Configuration file in effect
    pub fn config_path(&self) -> Result<PathBuf> {
        self.config_path
            .clone()
            .map_or_else(Config::default_path, Ok)
    }

    /// Load the layered configuration with command-line flags on top
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::load_from(&self.config_path()?)?;
        if let Some(url) = &self.api_url {
            config.set("api.base_url", url)?;
        }
        if let Some(key) = &self.api_key {
            config.set("api.api_key", key)?;
        }
        Ok(config)
    }
}

/// Common context for handlers that talk to the backend
pub struct HandlerContext {
    pub config: Config,
    pub session: Session,
    /// Token store shared with the session, for work outside it such as board polling
    pub tokens: Arc<dyn TokenRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub formatter: OutputFormatter,
}

impl HandlerContext {
    /// Create a new handler context
    ///
    /// Loads configuration, opens the session file and builds the HTTP
    /// transport, which reads the bearer token from that same file.
    pub fn new(overrides: &ConfigOverrides, formatter: OutputFormatter) -> Result<Self> {
        let config = overrides.load()?;
        let store = Arc::new(FileSessionStore::new(config.session_path()?));
        let transport = Arc::new(HttpTransport::new(&config.api, store.clone())?);
        let notifier = Arc::new(RecordingNotifier::default());
        let session = Session::open(transport, store.clone(), notifier.clone(), config.cache.stale_after())?;

        tracing::debug!(base_url = %config.api.base_url, "handler context ready");
        Ok(Self {
            config,
            session,
            tokens: store,
            notifier,
            formatter,
        })
    }
}

/// Run a mutation behind a spinner, then show its success notification
///
/// Failure notifications are not printed here; the error itself is
/// returned and reported once by `main`.
pub async fn with_pending<F, T>(formatter: &OutputFormatter, notifier: &RecordingNotifier, mutation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = formatter.spinner(PENDING_MESSAGE);
    let result = mutation.await;
    spinner.finish_and_clear();

    for notification in notifier.take() {
        if !notification.is_error() {
            formatter.success(&notification.message);
        }
    }
    result
}

/// Render an optional value for display
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Notification, Notifier};
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_flags_override_configuration_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "api:\n  base_url: https://file.example.com\n  api_key: from-file\n").unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(path),
            api_url: Some("https://flag.example.com/".to_string()),
            api_key: None,
        };
        let config = overrides.load().unwrap();

        assert_eq!(config.api.base_url, "https://flag.example.com");
        assert_eq!(config.api.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    #[serial]
    fn test_invalid_url_flag_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(temp_dir.path().join("config.yaml")),
            api_url: Some("localhost:3000".to_string()),
            api_key: None,
        };
        assert!(overrides.load().is_err());
    }

    #[tokio::test]
    async fn test_with_pending_drains_notifications() {
        let formatter = OutputFormatter::new(true, true);
        let notifier = RecordingNotifier::default();

        let value = with_pending(&formatter, &notifier, async {
            notifier.notify(Notification::success("Counter created"));
            Ok(7)
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(5)), "5");
        assert_eq!(or_dash::<u32>(None), "-");
    }
}
