use std::sync::{Arc, Mutex, PoisonError};

use crate::models::Principal;

/// StoredSession
///
/// A raw snapshot of the persisted session. The principal is kept exactly as it was
/// stored (serialized JSON); turning it into a `Principal` is the gate's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub principal: Option<String>,
}

impl StoredSession {
    /// credentials
    ///
    /// Returns the token and serialized principal only when both are present and
    /// non-empty. A half-written session is treated as no session at all.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let principal = self.principal.as_deref().filter(|p| !p.is_empty())?;
        Some((token, principal))
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.principal.is_none()
    }
}

/// SessionStore Trait
///
/// The contract every session backend fulfils. `token` and `principal` are always
/// written and cleared together. Stores use interior mutability so a single handle
/// can be shared between the gate, the backend client and the request handlers.
pub trait SessionStore: Send + Sync {
    fn read(&self) -> StoredSession;
    fn write(&self, token: &str, principal: &str);
    fn clear(&self);
}

/// SessionState
///
/// The shared handle used wherever a store is injected.
pub type SessionState = Arc<dyn SessionStore>;

/// persist_login
///
/// Stores a freshly issued token together with the principal the backend returned
/// for it.
pub fn persist_login(
    store: &dyn SessionStore,
    token: &str,
    principal: &Principal,
) -> Result<(), serde_json::Error> {
    let serialized = serde_json::to_string(principal)?;
    store.write(token, &serialized);
    Ok(())
}

/// MemorySessionStore
///
/// In-process store. Used by tests and by library callers that keep the session for
/// the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// seeded
    ///
    /// Starts from arbitrary raw contents, including half-written or corrupt ones.
    pub fn seeded(token: Option<&str>, principal: Option<&str>) -> Self {
        Self {
            inner: Mutex::new(StoredSession {
                token: token.map(str::to_string),
                principal: principal.map(str::to_string),
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> StoredSession {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, token: &str, principal: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.token = Some(token.to_string());
        inner.principal = Some(principal.to_string());
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *inner = StoredSession::default();
    }
}
