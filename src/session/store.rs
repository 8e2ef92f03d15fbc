//! Session ownership
//!
//! Sessions are shared through [`SessionHandle`]s. An operation holds the
//! handle's lock for its whole duration, model call included, so two
//! requests against the same session never interleave.

use super::Session;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Session used when the caller does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

/// Shared, lockable session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions keyed by caller-provided id
///
/// Sessions live for the lifetime of the store and are never persisted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `id`, creating an empty session on first use
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(handle) = self
            .sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
        {
            return Arc::clone(handle);
        }

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let handle = sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::info!("Created session {}", id);
            Arc::new(Mutex::new(Session::new()))
        });
        Arc::clone(handle)
    }

    /// Drop a session; returns `true` if it existed
    pub fn remove(&self, id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
