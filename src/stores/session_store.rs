use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::utils::auth::random_hex;
use crate::utils::time::is_idle;

/// Session key holding the authenticated user id
pub const SESSION_USER_ID: &str = "id";
/// Session key holding the pending OAuth state
pub const SESSION_STATE: &str = "state";

/// Per-client key/value session
pub trait Session: Send + Sync {
    /// Value for `key`, or an empty string when unset
    fn get_string(&self, key: &str) -> String;

    fn set(&self, key: &str, value: String);

    fn remove(&self, key: &str);

    /// Remove `key` only if it currently holds the non-empty `expected`.
    /// Returns whether it did; at most one caller wins for a given value.
    fn take_if(&self, key: &str, expected: &str) -> bool;
}

/// Session kept in process memory
pub struct MemorySession {
    values: DashMap<String, String>,
    last_seen: AtomicI64,
}

impl MemorySession {
    pub fn new(now: i64) -> Self {
        Self {
            values: DashMap::new(),
            last_seen: AtomicI64::new(now),
        }
    }

    pub fn touch(&self, now: i64) {
        self.last_seen.store(now, Ordering::Relaxed);
    }

    pub fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::Relaxed)
    }
}

impl Session for MemorySession {
    fn get_string(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(|value| value.value().clone())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values.remove(key);
    }

    fn take_if(&self, key: &str, expected: &str) -> bool {
        if expected.is_empty() {
            return false;
        }
        self.values
            .remove_if(key, |_, value| value == expected)
            .is_some()
    }
}

/// All live sessions, keyed by the id carried in the session cookie
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<MemorySession>>,
    ttl: i64,
}

/// Result of resolving a request's session cookie
pub struct SessionHandle {
    pub id: String,
    pub session: Arc<MemorySession>,
    /// True when no usable cookie was presented and a new session was opened
    pub created: bool,
}

impl SessionRegistry {
    pub fn new(ttl: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Look up a live session without opening one
    pub fn find(&self, id: &str, now: i64) -> Option<SessionHandle> {
        let session = self.sessions.get(id)?;
        if is_idle(session.last_seen(), self.ttl, now) {
            return None;
        }
        session.touch(now);

        Some(SessionHandle {
            id: id.to_string(),
            session: Arc::clone(session.value()),
            created: false,
        })
    }

    /// Return the session for `id` if it is live, otherwise open a new one
    pub fn resolve(&self, id: Option<&str>, now: i64) -> SessionHandle {
        if let Some(handle) = id.and_then(|id| self.find(id, now)) {
            return handle;
        }

        let session = Arc::new(MemorySession::new(now));
        self.insert_new(session)
    }

    /// Move a session to a freshly generated id; the old id stops resolving.
    /// `None` if `id` was already gone.
    pub fn rotate(&self, id: &str, now: i64) -> Option<SessionHandle> {
        let (_, session) = self.sessions.remove(id)?;
        session.touch(now);
        Some(self.insert_new(session))
    }

    fn insert_new(&self, session: Arc<MemorySession>) -> SessionHandle {
        let id = random_hex(16);
        self.sessions.insert(id.clone(), Arc::clone(&session));

        SessionHandle {
            id,
            session,
            created: true,
        }
    }

    /// Drop sessions idle for at least `ttl` seconds, returning how many were removed
    pub fn cleanup_expired(&self, now: i64) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !is_idle(session.last_seen(), self.ttl, now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
