// Bearer credential storage
//
// The HTTP client reads the token from a `CredentialStore` before every
// request and calls `clear()` on every 401. `FileCredentials` is the
// persisted variant written by `finboard login`; `MemoryCredentials` backs
// tokens supplied through config or environment, and tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// An authenticated session issued by the backend.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub username: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: SecretString, username: Option<String>) -> Self {
        Self {
            access_token,
            username,
            issued_at: Utc::now(),
        }
    }
}

/// Source of the bearer token attached to outgoing requests.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Current bearer token, if any.
    fn token(&self) -> Option<SecretString>;

    /// Persist a freshly issued session, replacing any previous one.
    fn store(&self, session: &Session) -> Result<(), Error>;

    /// Forget every persisted credential and session key.
    fn clear(&self);
}

// ── In-memory ────────────────────────────────────────────────────────

/// Credentials that live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<SecretString>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, session: &Session) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(session.access_token.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ── Session file ─────────────────────────────────────────────────────

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    #[serde(default)]
    username: Option<String>,
    issued_at: DateTime<Utc>,
}

/// Session persisted as a JSON file (mode 0600 on unix).
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full persisted session, if one exists and parses.
    pub fn load(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => Some(Session {
                access_token: SecretString::from(stored.access_token),
                username: stored.username,
                issued_at: stored.issued_at,
            }),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentials {
    fn token(&self) -> Option<SecretString> {
        self.load().map(|s| s.access_token)
    }

    fn store(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Session(format!("cannot create {}: {e}", parent.display())))?;
        }
        let stored = StoredSession {
            access_token: session.access_token.expose_secret().to_owned(),
            username: session.username.clone(),
            issued_at: session.issued_at,
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| Error::Session(format!("cannot encode session: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Session(format!("cannot write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::Session(format!("cannot restrict permissions: {e}")))?;
        }

        debug!(path = %self.path.display(), "session stored");
        Ok(())
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session file removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove session file"),
        }
    }
}
