//! Session registry: at most one live session per username.
//!
//! Reimplements the single-session rule as an explicit mapping from
//! username to current session id, independent of any transport's
//! session mechanism. One mutex guards both directions of the mapping,
//! so every transition (create, supersede, revoke) is atomic and
//! read-after-write consistent: the check that follows a supersession
//! already sees the old id as invalid.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

/// Opaque session identifier handed to clients as a bearer token.
pub type SessionId = Uuid;

#[derive(Default)]
struct Sessions {
    by_user: HashMap<String, SessionId>,
    by_id: HashMap<SessionId, String>,
}

/// In-process session registry.
#[derive(Default)]
pub struct SessionRegistry {
    inner: Mutex<Sessions>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session for `username`, invalidating any session
    /// the user already holds. Exactly one id per username survives,
    /// also under concurrent logins.
    pub fn create_session(&self, username: &str) -> SessionId {
        let id = Uuid::new_v4();
        let mut sessions = self.lock();

        if let Some(old) = sessions.by_user.insert(username.to_string(), id) {
            sessions.by_id.remove(&old);
            tracing::debug!(%username, "Superseded previous session");
        }
        sessions.by_id.insert(id, username.to_string());

        id
    }

    pub fn is_valid(&self, id: &SessionId) -> bool {
        self.lock().by_id.contains_key(id)
    }

    /// Username bound to a live session id, if any.
    pub fn resolve(&self, id: &SessionId) -> Option<String> {
        self.lock().by_id.get(id).cloned()
    }

    /// Destroy one session (logout).
    pub fn invalidate(&self, id: &SessionId) {
        let mut sessions = self.lock();
        if let Some(username) = sessions.by_id.remove(id) {
            // only drop the user mapping if it still points at this id
            if sessions.by_user.get(&username) == Some(id) {
                sessions.by_user.remove(&username);
            }
        }
    }

    /// Destroy every session bound to `username`. Called synchronously
    /// from the operation that changes the password or deletes the
    /// account, never deferred.
    pub fn revoke_all_for_user(&self, username: &str) {
        let mut sessions = self.lock();
        if let Some(id) = sessions.by_user.remove(username) {
            sessions.by_id.remove(&id);
            tracing::debug!(%username, "Revoked session");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sessions> {
        // a poisoned registry lock is unrecoverable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
