//! In-memory session store with TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::SessionResult;
use crate::store::SessionStore;
use crate::turn::ConversationTurn;

/// Default idle lifetime of a session: one hour.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

struct SessionEntry {
    turns: Vec<ConversationTurn>,
    expires_at: Instant,
}

/// An in-memory [`SessionStore`] for single-process deployments.
///
/// Sessions live in a `HashMap` behind a `tokio::sync::RwLock`. Every append
/// pushes the session's expiry deadline out by the configured TTL, so a
/// session stays alive as long as the conversation does. Expired sessions
/// read as empty and are dropped lazily on access.
///
/// Uses `tokio::time::Instant` for deadlines, so tests can drive expiry with
/// a paused clock.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    /// Create a store whose sessions expire after `ttl` of inactivity.
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), ttl }
    }

    /// Number of live (unexpired) sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|entry| entry.expires_at > now).count()
    }

    /// Whether the store holds no live sessions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, turn: ConversationTurn) -> SessionResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry { turns: Vec::new(), expires_at: now + self.ttl });
        if entry.expires_at <= now {
            // The old deadline passed; this append starts a fresh session.
            entry.turns.clear();
        }
        entry.turns.push(turn);
        entry.expires_at = now + self.ttl;
        Ok(())
    }

    async fn list(&self, session_id: &str) -> SessionResult<Vec<ConversationTurn>> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(entry) if entry.expires_at > now => return Ok(entry.turns.clone()),
                Some(_) => {}
                None => return Ok(Vec::new()),
            }
        }

        // Drop the expired session, rechecking under the write lock in case
        // a concurrent append refreshed it in between.
        let mut sessions = self.sessions.write().await;
        if sessions.get(session_id).is_some_and(|entry| entry.expires_at <= now) {
            sessions.remove(session_id);
            debug!(session_id, "dropped expired session");
        }
        Ok(Vec::new())
    }

    async fn clear(&self, session_id: &str) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::Role;

    #[tokio::test]
    async fn append_then_list_preserves_order() {
        let store = InMemorySessionStore::default();
        store.append("s1", ConversationTurn::user("What did the Fed do?")).await.unwrap();
        store.append("s1", ConversationTurn::bot("It raised rates.")).await.unwrap();
        store.append("s1", ConversationTurn::user("By how much?")).await.unwrap();

        let turns = store.list("s1").await.unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "What did the Fed do?");
        assert_eq!(turns[1].role, Role::Bot);
        assert_eq!(turns[2].text, "By how much?");
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemorySessionStore::default();
        store.append("a", ConversationTurn::user("first")).await.unwrap();
        store.append("b", ConversationTurn::user("second")).await.unwrap();

        assert_eq!(store.list("a").await.unwrap().len(), 1);
        assert_eq!(store.list("b").await.unwrap().len(), 1);
        assert_eq!(store.list("a").await.unwrap()[0].text, "first");
    }

    #[tokio::test]
    async fn clear_empties_the_session() {
        let store = InMemorySessionStore::default();
        store.append("s1", ConversationTurn::user("hello")).await.unwrap();
        store.clear("s1").await.unwrap();
        assert!(store.list("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_reads_empty() {
        let store = InMemorySessionStore::default();
        assert!(store.list("no-such-session").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_after_ttl() {
        let store = InMemorySessionStore::new(Duration::from_secs(10));
        store.append("s1", ConversationTurn::user("hello")).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(store.list("s1").await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn append_refreshes_the_deadline() {
        let store = InMemorySessionStore::new(Duration::from_secs(10));
        store.append("s1", ConversationTurn::user("one")).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        store.append("s1", ConversationTurn::bot("two")).await.unwrap();

        // Past the original deadline but inside the refreshed one.
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(store.list("s1").await.unwrap().len(), 2);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(store.list("s1").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn append_after_expiry_starts_fresh() {
        let store = InMemorySessionStore::new(Duration::from_secs(10));
        store.append("s1", ConversationTurn::user("old")).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        store.append("s1", ConversationTurn::user("new")).await.unwrap();

        let turns = store.list("s1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text, "new");
    }
}
