//! Error types for the `newsbot-session` crate.

use thiserror::Error;

/// Errors that can occur in session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing store failed to read or write a session.
    #[error("Session store error: {0}")]
    Store(String),
}

/// A convenience result type for session store operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
