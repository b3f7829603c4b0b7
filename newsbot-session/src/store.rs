//! Session store trait for appending and reading conversation history.

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::turn::ConversationTurn;

/// An append-only log of conversation turns keyed by session id.
///
/// The answering engine only ever appends turns, lists them back in
/// insertion order, and clears whole sessions. Backends are free to expire
/// idle sessions on their own schedule; an expired session simply reads as
/// empty.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a turn to the session, creating the session if needed.
    async fn append(&self, session_id: &str, turn: ConversationTurn) -> SessionResult<()>;

    /// List all turns for the session in insertion order.
    ///
    /// Unknown or expired sessions read as empty.
    async fn list(&self, session_id: &str) -> SessionResult<Vec<ConversationTurn>>;

    /// Remove the session and all its turns. No-op for unknown sessions.
    async fn clear(&self, session_id: &str) -> SessionResult<()>;
}
