//! Conversation history storage for newsbot.
//!
//! This crate provides:
//! - [`ConversationTurn`] and [`Role`], the persisted chat turn types
//! - [`SessionStore`], the async trait the answering engine consumes
//! - [`InMemorySessionStore`], a TTL-expiring store for single-process deployments

mod error;
mod memory;
mod store;
mod turn;

pub use error::{SessionError, SessionResult};
pub use memory::{DEFAULT_SESSION_TTL, InMemorySessionStore};
pub use store::SessionStore;
pub use turn::{ConversationTurn, Role};
