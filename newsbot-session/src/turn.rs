//! Data types for persisted conversation turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message typed by the end user.
    User,
    /// A reply produced by the answering engine.
    Bot,
}

/// A single chat message within a session.
///
/// Turns are append-only; the store preserves the order in which they were
/// appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub role: Role,
    /// The message text.
    pub text: String,
    /// When the turn was appended.
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a user turn stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), timestamp: Utc::now() }
    }

    /// Create a bot turn stamped with the current time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self { role: Role::Bot, text: text.into(), timestamp: Utc::now() }
    }
}
