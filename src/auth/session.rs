//! Persistent key-value storage for the login session.
//!
//! The browser original kept `authToken`, `username`, and `userInfo` in
//! origin-local storage; the same layout lives here behind a small store
//! that is either in-memory or backed by a JSON file surviving restarts.
//! Storage trouble is never fatal: unreadable state starts empty and write
//! failures are logged and dropped.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";
pub const USER_INFO_KEY: &str = "userInfo";

/// Snapshot of the persisted session. A session is either fully present or
/// fully absent; partial states can only come from outside interference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    pub user_info: Option<Value>,
}

/// Store holding the login session entries. Cloning returns a handle to the
/// same underlying store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    entries: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Ephemeral store, used by tests and the startup health probe.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                path: None,
            })),
        }
    }

    /// Store backed by a JSON file. A missing or unreadable file starts the
    /// store empty; it is created on the first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("corrupt session file {}: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries,
                path: Some(path),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a session. The user info record defaults to `{"username": …}`
    /// when the backend did not send one.
    pub fn save(&self, token: &str, username: &str, user_info: Option<&Value>) {
        let info = user_info
            .cloned()
            .unwrap_or_else(|| json!({ "username": username }));

        let mut inner = self.lock();
        inner.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        inner
            .entries
            .insert(USERNAME_KEY.to_string(), username.to_string());
        inner
            .entries
            .insert(USER_INFO_KEY.to_string(), info.to_string());
        persist(&inner);
    }

    /// Remove all session entries. Safe to call on an already empty store.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.remove(TOKEN_KEY);
        inner.entries.remove(USERNAME_KEY);
        inner.entries.remove(USER_INFO_KEY);
        persist(&inner);
    }

    #[must_use]
    pub fn get(&self) -> Session {
        Session {
            token: self.token(),
            username: self.username(),
            user_info: self.user_info(),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().entries.get(TOKEN_KEY).cloned()
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.lock().entries.get(USERNAME_KEY).cloned()
    }

    /// The stored user info record, or `None` when absent or corrupt.
    #[must_use]
    pub fn user_info(&self) -> Option<Value> {
        let raw = self.lock().entries.get(USER_INFO_KEY).cloned()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("corrupt user info entry: {err}");
                None
            }
        }
    }

    /// True iff both the token and the username are present. Expiry is a
    /// separate explicit check.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let inner = self.lock();
        inner.entries.contains_key(TOKEN_KEY) && inner.entries.contains_key(USERNAME_KEY)
    }
}

fn persist(inner: &Inner) {
    let Some(path) = &inner.path else {
        return;
    };

    match serde_json::to_string_pretty(&inner.entries) {
        Ok(contents) => {
            if let Err(err) = fs::write(path, contents) {
                warn!("failed to write session file {}: {err}", path.display());
            }
        }
        Err(err) => warn!("failed to encode session file: {err}"),
    }
}
