use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{AuthService, AuthStatusChannel, Subscription};
use crate::config::Config;
use crate::{Error, Result};

/// How long a locally created session stays valid.
const SESSION_LIFETIME_HOURS: i64 = 24 * 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_name: &str) -> Self {
        let issued = Utc::now();
        let mut hasher = Sha256::new();
        hasher.update(user_name.as_bytes());
        hasher.update(issued.to_rfc3339().as_bytes());

        Self {
            access_token: general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize()),
            user_name: user_name.to_string(),
            expires_at: issued + Duration::hours(SESSION_LIFETIME_HOURS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json_data = serde_json::to_string(self)?;
        let encoded = general_purpose::STANDARD.encode(obfuscate(json_data.as_bytes()));
        fs::write(path, encoded)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let bytes = general_purpose::STANDARD
            .decode(contents.trim())
            .map_err(|e| Error::Auth(format!("Failed to decode session: {}", e)))?;
        let json_str = String::from_utf8(obfuscate(&bytes))
            .map_err(|e| Error::Auth(format!("Invalid session data: {}", e)))?;
        let session = serde_json::from_str(&json_str)
            .map_err(|e| Error::Auth(format!("Failed to parse session: {}", e)))?;

        Ok(Some(session))
    }
}

/// XOR with a key derived from the machine and user. Symmetric, so the same
/// call reverses it. This is obfuscation, not encryption.
fn obfuscate(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();

    #[cfg(target_os = "linux")]
    {
        if let Ok(machine_id) = fs::read_to_string("/etc/machine-id") {
            hasher.update(machine_id.trim().as_bytes());
        }
    }

    hasher.update(b"tawfir-session-key-v1");
    if let Ok(username) = std::env::var("USER") {
        hasher.update(username.as_bytes());
    }
    let key = hasher.finalize();

    data.iter()
        .enumerate()
        .map(|(i, byte)| byte ^ key[i % key.len()])
        .collect()
}

/// File-backed session store that publishes login state to its subscribers.
pub struct SessionManager {
    path: PathBuf,
    session: Mutex<Option<Session>>,
    status: AuthStatusChannel,
}

impl SessionManager {
    pub fn new() -> Result<Self> {
        Self::open(Config::data_dir()?.join("session.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let session = match Session::load(&path) {
            Ok(Some(session)) if session.is_expired() => {
                log::info!("Stored session for {} has expired", session.user_name);
                None
            }
            Ok(session) => session,
            Err(e) => {
                log::warn!("Ignoring unreadable session file: {}", e);
                None
            }
        };

        let status = AuthStatusChannel::new(Some(session.is_some()));
        Ok(Self {
            path,
            session: Mutex::new(session),
            status,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_ok()
    }

    pub fn current(&self) -> Result<Session> {
        self.expire_if_due()?;
        let guard = self
            .session
            .lock()
            .map_err(|_| Error::Auth("Session lock poisoned".to_string()))?;
        guard.clone().ok_or(Error::NotAuthenticated)
    }

    /// Drops a session whose expiry has passed and publishes `Some(false)`.
    /// Returns whether a session was dropped.
    pub fn expire_if_due(&self) -> Result<bool> {
        let expired = {
            let mut guard = self
                .session
                .lock()
                .map_err(|_| Error::Auth("Session lock poisoned".to_string()))?;
            match guard.as_ref() {
                Some(session) if session.is_expired() => guard.take(),
                _ => None,
            }
        };
        let Some(session) = expired else {
            return Ok(false);
        };

        log::info!("Session for {} has expired", session.user_name);
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("Failed to remove expired session file: {}", e);
            }
        }
        self.status.emit(Some(false));
        Ok(true)
    }

    pub fn login(&self, user_name: &str) -> Result<Session> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(Error::Auth("User name must not be empty".to_string()));
        }

        let session = Session::new(user_name);
        session.save(&self.path)?;
        {
            let mut guard = self
                .session
                .lock()
                .map_err(|_| Error::Auth("Session lock poisoned".to_string()))?;
            *guard = Some(session.clone());
        }

        log::info!("Logged in as {}", session.user_name);
        self.status.emit(Some(true));
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        {
            let mut guard = self
                .session
                .lock()
                .map_err(|_| Error::Auth("Session lock poisoned".to_string()))?;
            *guard = None;
        }

        log::info!("Logged out");
        self.status.emit(Some(false));
        Ok(())
    }

    /// Terminates the status stream for current subscribers.
    pub fn publish_error(&self, reason: impl Into<String>) {
        self.status.fail(reason);
    }
}

impl AuthService for SessionManager {
    fn is_logged_in(&self) -> Subscription {
        self.status.subscribe()
    }
}
