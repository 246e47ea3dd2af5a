//! SessionStore trait definition.
//!
//! Sessions are keyed by an opaque user identifier. Lifecycle policy
//! (eviction, persistence) belongs to the implementation; the core only
//! reads, writes, and deletes whole states. Implementations live in
//! coursewise-infra (e.g., `InMemorySessionStore`).

use coursewise_types::chat::SessionState;
use coursewise_types::error::SessionError;

/// Store trait for per-user conversation state.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition). The design
/// assumes at most one in-flight request per user id; concurrent
/// read-modify-write for the same id is last-writer-wins.
pub trait SessionStore: Send + Sync {
    /// Fetch the state for a user, if one exists.
    fn get(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionState>, SessionError>> + Send;

    /// Store (create or replace) the state for a user.
    fn put(
        &self,
        user_id: &str,
        state: SessionState,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Remove the state for a user. Removing an absent user is a no-op.
    fn delete(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}
