//! HTTP API for retrieval-augmented news question answering.
//!
//! Endpoints:
//! - `POST /ask` answers a question, minting a session id when none is given
//! - `GET /history/{session_id}` returns the recorded conversation
//! - `DELETE /history/{session_id}` clears it
//! - `GET /health` liveness probe

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use server::{AppState, FALLBACK_ANSWER, build_router, run_server};
