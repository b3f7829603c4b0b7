//! Conversation context: recent turns fetched fresh for every query.

use std::sync::Arc;

use newsbot_session::{ConversationTurn, SessionStore};
use tracing::debug;

use crate::error::Result;

/// Fetches a bounded window of recent conversation turns.
///
/// The store is consulted on every call, never cached, so concurrent
/// appends from other requests are always picked up. Turns come back in
/// chronological order, oldest first.
pub struct ContextBuilder {
    store: Arc<dyn SessionStore>,
    max_turns: usize,
    char_budget: usize,
}

impl ContextBuilder {
    /// Create a context builder over the given session store.
    pub fn new(store: Arc<dyn SessionStore>, max_turns: usize, char_budget: usize) -> Self {
        Self { store, max_turns, char_budget }
    }

    /// The most recent turns of the session, bounded by turn count and
    /// total character budget.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SessionError`] if the store fails.
    ///
    /// [`RagError::SessionError`]: crate::error::RagError::SessionError
    pub async fn recent_turns(&self, session_id: &str) -> Result<Vec<ConversationTurn>> {
        let turns = self.store.list(session_id).await?;
        let bounded = bound_turns(turns, self.max_turns, self.char_budget);
        debug!(session_id = %session_id, turn_count = bounded.len(), "built conversation context");
        Ok(bounded)
    }
}

/// Keep the newest turns that fit both bounds, preserving chronological order.
///
/// Turns are taken newest-first until either the turn count or the character
/// budget would be exceeded. The newest turn is always kept, even when it
/// alone exceeds the budget, so a long latest message never erases all
/// context.
fn bound_turns(
    turns: Vec<ConversationTurn>,
    max_turns: usize,
    char_budget: usize,
) -> Vec<ConversationTurn> {
    let mut kept: Vec<ConversationTurn> = Vec::new();
    let mut chars = 0;

    for turn in turns.into_iter().rev() {
        if kept.len() == max_turns {
            break;
        }
        let turn_chars = turn.text.chars().count();
        if !kept.is_empty() && chars + turn_chars > char_budget {
            break;
        }
        chars += turn_chars;
        kept.push(turn);
    }

    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use newsbot_session::InMemorySessionStore;

    use super::*;

    fn builder(store: Arc<InMemorySessionStore>, max_turns: usize, budget: usize) -> ContextBuilder {
        ContextBuilder::new(store, max_turns, budget)
    }

    #[tokio::test]
    async fn returns_turns_in_chronological_order() {
        let store = Arc::new(InMemorySessionStore::default());
        store.append("s1", ConversationTurn::user("first")).await.unwrap();
        store.append("s1", ConversationTurn::bot("second")).await.unwrap();
        store.append("s1", ConversationTurn::user("third")).await.unwrap();

        let turns = builder(store, 6, 2000).recent_turns("s1").await.unwrap();
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn keeps_only_the_newest_turns_within_the_turn_bound() {
        let store = Arc::new(InMemorySessionStore::default());
        for i in 0..10 {
            store.append("s1", ConversationTurn::user(format!("turn {i}"))).await.unwrap();
        }

        let turns = builder(store, 4, 10_000).recent_turns("s1").await.unwrap();
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["turn 6", "turn 7", "turn 8", "turn 9"]);
    }

    #[tokio::test]
    async fn stops_at_the_character_budget() {
        let store = Arc::new(InMemorySessionStore::default());
        for i in 0..5 {
            // Each turn is exactly 100 characters.
            let text = format!("{:<100}", format!("turn {i}"));
            store.append("s1", ConversationTurn::user(text)).await.unwrap();
        }

        // Budget fits the newest two turns only.
        let turns = builder(store, 6, 250).recent_turns("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert!(turns[0].text.starts_with("turn 3"));
        assert!(turns[1].text.starts_with("turn 4"));
    }

    #[tokio::test]
    async fn an_oversized_newest_turn_is_still_kept() {
        let store = Arc::new(InMemorySessionStore::default());
        store.append("s1", ConversationTurn::user("older")).await.unwrap();
        store.append("s1", ConversationTurn::user("x".repeat(500))).await.unwrap();

        let turns = builder(store, 6, 100).recent_turns("s1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text.chars().count(), 500);
    }

    #[tokio::test]
    async fn cleared_session_yields_empty_context() {
        let store = Arc::new(InMemorySessionStore::default());
        store.append("s1", ConversationTurn::user("hello")).await.unwrap();
        store.clear("s1").await.unwrap();

        let turns = builder(store, 6, 2000).recent_turns("s1").await.unwrap();
        assert!(turns.is_empty());
    }
}
