//! Embedding provider abstraction.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// Turns text into fixed-dimension vectors.
///
/// Implementations must report a stable [`dimensions`](Embedder::dimensions)
/// value and return vectors of exactly that length; the index rejects
/// anything else. Calls take an explicit timeout and must give up once it
/// elapses, reporting the failure as [`RagError::EmbeddingError`].
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the text is empty, the
    /// provider call fails, or the timeout elapses.
    async fn embed(&self, text: &str, timeout: Duration) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// The default implementation embeds sequentially with `timeout`
    /// applied to each text; providers with a batch endpoint should
    /// override it with a single call covered by one timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingBatchError`] naming every empty input,
    /// or [`RagError::EmbeddingError`] if the provider call fails or times
    /// out. A failed batch produces no vectors at all.
    async fn embed_batch(&self, texts: &[&str], timeout: Duration) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text, timeout).await?);
        }
        Ok(embeddings)
    }

    /// The dimensionality of every vector this embedder produces.
    fn dimensions(&self) -> usize;
}

/// Reject empty input before it reaches a provider.
pub fn require_text(provider: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RagError::EmbeddingError {
            provider: provider.to_string(),
            message: "input text is empty".to_string(),
        });
    }
    Ok(())
}

/// Reject a batch containing empty inputs, naming every failing index.
///
/// All inputs are checked before any is accepted, so callers learn about
/// every bad element in one pass.
pub fn validate_batch(provider: &str, texts: &[&str]) -> Result<()> {
    let failed_indices: Vec<usize> = texts
        .iter()
        .enumerate()
        .filter(|(_, text)| text.trim().is_empty())
        .map(|(idx, _)| idx)
        .collect();
    if !failed_indices.is_empty() {
        return Err(RagError::EmbeddingBatchError {
            provider: provider.to_string(),
            failed_indices,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_rejects_blank_input() {
        assert!(require_text("test", "hello").is_ok());
        assert!(require_text("test", "").is_err());
        assert!(require_text("test", "  \n\t ").is_err());
    }

    #[test]
    fn validate_batch_reports_every_failing_index() {
        let texts = ["ok", "", "also ok", "   "];
        let err = validate_batch("test", &texts).unwrap_err();
        match err {
            RagError::EmbeddingBatchError { failed_indices, .. } => {
                assert_eq!(failed_indices, vec![1, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_batch_accepts_clean_input() {
        assert!(validate_batch("test", &["a", "b"]).is_ok());
        assert!(validate_batch("test", &[]).is_ok());
    }
}
