//! Login session
//!
//! Holds the bearer credential issued by the catalog service. A `Session` is
//! created once and handed to every component that talks to the service;
//! login fills it, logout clears it. `SessionFile` keeps it across process
//! runs.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;

/// Credential and identity of the logged-in user
#[derive(Debug, Clone)]
pub struct SessionState {
    pub email: String,
    pub token: SecretString,
    pub logged_in_at: DateTime<Utc>,
}

/// Shared handle to the current login, if any
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<SessionState>>>,
}

impl Session {
    /// A session with nobody logged in
    pub fn new() -> Self {
        Self::default()
    }

    /// A session restored from an earlier login
    pub fn from_state(state: SessionState) -> Self {
        Session {
            inner: Arc::new(RwLock::new(Some(state))),
        }
    }

    /// Record a successful login
    pub async fn begin(&self, email: impl Into<String>, token: SecretString) {
        let email = email.into();
        info!("Session started for {}", email);
        *self.inner.write().await = Some(SessionState {
            email,
            token,
            logged_in_at: Utc::now(),
        });
    }

    /// Forget the current credential
    pub async fn clear(&self) {
        if self.inner.write().await.take().is_some() {
            info!("Session cleared");
        }
    }

    /// Value for the `Authorization` header, when logged in
    pub async fn bearer(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| format!("Bearer {}", s.token.expose_secret()))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    pub async fn email(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.email.clone())
    }

    pub async fn snapshot(&self) -> Option<SessionState> {
        self.inner.read().await.clone()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    email: String,
    token: String,
    logged_in_at: DateTime<Utc>,
}

/// On-disk copy of the session
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionFile { path: path.into() }
    }

    /// Default location under the state directory
    pub fn default_location() -> Self {
        Self::new(crate::config::state_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a saved session; a missing file means nobody is logged in
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            debug!("No saved session at {}", self.path.display());
            return Ok(Session::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&content)?;
        Ok(Session::from_state(SessionState {
            email: stored.email,
            token: SecretString::from(stored.token),
            logged_in_at: stored.logged_in_at,
        }))
    }

    /// Write the session, or delete the file when nobody is logged in
    pub async fn save(&self, session: &Session) -> Result<()> {
        let Some(state) = session.snapshot().await else {
            return self.remove();
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredSession {
            email: state.email,
            token: state.token.expose_secret().to_string(),
            logged_in_at: state.logged_in_at,
        };
        write_private(&self.path, serde_json::to_string_pretty(&stored)?.as_bytes())?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Write a file only the current user can read
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_begin_and_clear() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);
        assert!(session.bearer().await.is_none());

        session
            .begin("ana@neki.com", SecretString::from("abc123"))
            .await;
        assert_eq!(session.bearer().await.as_deref(), Some("Bearer abc123"));
        assert_eq!(session.email().await.as_deref(), Some("ana@neki.com"));

        // Clones observe the same login
        let other = session.clone();
        other.clear().await;
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("state").join("session.json"));

        assert!(!file.load().unwrap().is_authenticated().await);

        let session = Session::new();
        session.begin("ana@neki.com", SecretString::from("tok")).await;
        file.save(&session).await.unwrap();

        let restored = file.load().unwrap();
        assert_eq!(restored.bearer().await.as_deref(), Some("Bearer tok"));

        session.clear().await;
        file.save(&session).await.unwrap();
        assert!(!file.path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let session = Session::new();
        session.begin("ana@neki.com", SecretString::from("tok")).await;
        SessionFile::new(&path).save(&session).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(SessionFile::new(&path).load().unwrap().is_authenticated().await);
    }
}
