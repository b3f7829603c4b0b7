//! Generative model abstraction for answer synthesis.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// A text generation backend.
///
/// The synthesizer treats the model as a black box: it sends one prompt and
/// expects one text completion. Implementations must give up once `timeout`
/// has elapsed and report the failure as [`RagError::SynthesisError`], so
/// callers can fall back to a canned answer instead of hanging.
///
/// [`RagError::SynthesisError`]: crate::error::RagError::SynthesisError
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`, waiting at most `timeout`.
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String>;
}
