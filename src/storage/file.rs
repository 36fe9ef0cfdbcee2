use super::repository::{HeldTicketRepository, TokenRepository};
use crate::core::ClaimedTicket;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Contents of the session file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_ticket: Option<ClaimedTicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Session state persisted as a single JSON file
///
/// Writes go to a sibling temporary file that is renamed into place, so a
/// crash never leaves a half-written session behind. On Unix the file is
/// readable by its owner only since it contains the bearer token.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Clone for FileSessionStore {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl FileSessionStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole session file; a missing file is an empty session
    pub fn read(&self) -> Result<SessionFile> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(SessionFile::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SessionFile),
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut session = self.read()?;
        apply(&mut session);
        session.updated_at = Some(Utc::now());
        self.write(&session)
    }

    fn write(&self, session: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(session)?)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl TokenRepository for FileSessionStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.read()?.token)
    }

    fn save_token(&self, token: &str) -> Result<()> {
        self.update(|session| session.token = Some(token.to_string()))
    }

    fn clear_token(&self) -> Result<()> {
        self.update(|session| session.token = None)
    }
}

impl HeldTicketRepository for FileSessionStore {
    fn load_held(&self) -> Result<Option<ClaimedTicket>> {
        Ok(self.read()?.held_ticket)
    }

    fn save_held(&self, ticket: &ClaimedTicket) -> Result<()> {
        self.update(|session| session.held_ticket = Some(ticket.clone()))
    }

    fn clear_held(&self) -> Result<()> {
        self.update(|session| session.held_ticket = None)
    }
}
