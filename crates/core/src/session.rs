// crates/core/src/session.rs

//! The logged-in user and where it is kept between runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Profile blob returned by `POST /api/login`.
///
/// The backend is loose about field names (`username` vs `Username`), so both
/// are kept and unknown fields ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "Username", default, skip_serializing_if = "Option::is_none")]
    pub username_upper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Name used when the backend wants to know who is asking.
    pub fn display_name(&self) -> &str {
        [&self.username_upper, &self.username, &self.name, &self.email]
            .into_iter()
            .find_map(|field| field.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown User")
    }
}

/// Whether `user` is the administrator account.
pub fn is_admin_identity(user: &SessionUser) -> bool {
    let exact = |field: &Option<String>| field.as_deref() == Some("admin");
    let loose = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("admin"))
    };

    exact(&user.username)
        || exact(&user.email)
        || exact(&user.username_upper)
        || exact(&user.name)
        || loose(&user.username)
        || loose(&user.email)
}

/// Keeps the logged-in user between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionUser>>;
    fn save(&self, user: &SessionUser) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON file on disk.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionUser>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {:?}", self.path));
            }
        };

        match serde_json::from_str(&data) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                // A corrupt blob means nobody is logged in.
                warn!(path = ?self.path, error = %e, "discarding unreadable session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, user: &SessionUser) -> Result<()> {
        let json = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, json).with_context(|| format!("failed to write {:?}", self.path))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {:?}", self.path)),
        }
    }
}

/// In-process store, for tests and embedding.
#[derive(Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<SessionUser>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionUser>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, user: &SessionUser) -> Result<()> {
        *self.lock()? = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemorySessionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionUser>>> {
        self.user
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))
    }
}
