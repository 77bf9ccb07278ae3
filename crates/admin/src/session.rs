//! Persisted admin session shared by the guard and the API client.
//!
//! The panel holds exactly one upstream session: the bearer token and the
//! user profile returned by the login endpoint. Both are persisted to a JSON
//! file under two separate keys so the session survives restarts, and kept
//! in memory behind a lock so every request (and the review poll task) sees
//! the same state through one [`SessionStore`] handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use loomworks_core::AdminUser;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

/// Field names under which the two session parts are persisted.
pub mod keys {
    /// The opaque bearer token string.
    pub const TOKEN: &str = "token";
    /// The serialized user profile.
    pub const USER: &str = "user";
}

/// The authenticated admin identity plus bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque credential sent as `Authorization: Bearer <token>`.
    pub token: String,
    /// Profile returned by the login endpoint; `is_admin` gates access.
    pub user: AdminUser,
}

impl Session {
    /// Create a session from a login response.
    #[must_use]
    pub const fn new(token: String, user: AdminUser) -> Self {
        Self { token, user }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// What the store currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    /// No session (or only one of the two keys) is persisted.
    Missing,
    /// A session is persisted but its user profile does not parse.
    Corrupt,
    /// A session with a non-empty token and a parsed user profile.
    Active(Session),
}

/// Errors writing or removing the session file.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process-wide session storage with get/set/clear accessors.
///
/// Cheaply cloneable; all clones share the same state. The in-memory copy is
/// authoritative while the process runs, the file is write-through so a
/// restart resumes the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    path: PathBuf,
    cell: RwLock<StoredSession>,
}

impl SessionStore {
    /// Open the store, reading any previously persisted session.
    ///
    /// Never fails: an unreadable file logs a warning and counts as no
    /// session, while a file that exists but does not parse is kept as
    /// [`StoredSession::Corrupt`] so the next navigation can clear it and
    /// redirect with the matching reason.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = read_state(&path);

        if matches!(state, StoredSession::Corrupt) {
            tracing::warn!(path = %path.display(), "Persisted session is corrupt");
        }

        Self {
            inner: Arc::new(SessionStoreInner {
                path,
                cell: RwLock::new(state),
            }),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Current session state.
    pub async fn get(&self) -> StoredSession {
        self.inner.cell.read().await.clone()
    }

    /// The bearer token, when an active session is stored.
    pub async fn token(&self) -> Option<String> {
        match &*self.inner.cell.read().await {
            StoredSession::Active(session) => Some(session.token.clone()),
            StoredSession::Missing | StoredSession::Corrupt => None,
        }
    }

    /// Persist a new session (both keys) and make it current.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written; the in-memory
    /// state is left unchanged in that case.
    pub async fn set(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut cell = self.inner.cell.write().await;

        let file = serde_json::json!({
            keys::TOKEN: session.token,
            keys::USER: serde_json::to_value(&session.user)?,
        });
        std::fs::write(&self.inner.path, serde_json::to_string_pretty(&file)?)?;

        *cell = StoredSession::Active(session);
        Ok(())
    }

    /// Drop the current session and delete the backing file.
    ///
    /// Idempotent: clearing an already-cleared session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be removed;
    /// the in-memory session is dropped regardless.
    pub async fn clear(&self) -> Result<(), SessionStoreError> {
        let mut cell = self.inner.cell.write().await;
        *cell = StoredSession::Missing;

        match std::fs::remove_file(&self.inner.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read and classify the persisted session.
fn read_state(path: &Path) -> StoredSession {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredSession::Missing,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read session file");
            return StoredSession::Missing;
        }
    };

    let Ok(value) = serde_json::from_str::<Value>(&raw) else {
        return StoredSession::Corrupt;
    };

    let token = value.get(keys::TOKEN).and_then(Value::as_str);
    let user = value.get(keys::USER);

    match (token, user) {
        (Some(token), Some(user)) if !token.is_empty() => {
            match serde_json::from_value::<AdminUser>(user.clone()) {
                Ok(user) => StoredSession::Active(Session::new(token.to_string(), user)),
                Err(_) => StoredSession::Corrupt,
            }
        }
        _ => StoredSession::Missing,
    }
}
