//! In-memory session store backed by DashMap.
//!
//! State lives for the lifetime of the process. Each operation locks only
//! the shard owning the user id, so unrelated sessions never contend.

use dashmap::DashMap;

use coursewise_core::session::SessionStore;
use coursewise_types::chat::SessionState;
use coursewise_types::error::SessionError;

/// Process-local session store keyed by user id.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<SessionState>, SessionError> {
        Ok(self.sessions.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, user_id: &str, state: SessionState) -> Result<(), SessionError> {
        self.sessions.insert(user_id.to_string(), state);
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), SessionError> {
        self.sessions.remove(user_id);
        Ok(())
    }
}
