//! Query-side retrieval: embed a question, search the index.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::article::ScoredPassage;
use crate::config::EngineConfig;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::index::VectorIndex;

/// Retrieves the passages most relevant to a question.
///
/// Zero matches is a normal outcome, not an error: an empty index or a
/// question unrelated to the corpus both produce an empty result.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
    top_k: usize,
    min_score: f32,
    embedding_timeout: Duration,
}

impl Retriever {
    /// Create a retriever over the given embedder and index.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<VectorIndex>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k: config.top_k,
            min_score: config.min_score,
            embedding_timeout: config.embedding_timeout,
        }
    }

    /// Embed the question and return up to `top_k` passages scoring at
    /// least `min_score`, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if the question cannot be embedded within the
    /// configured timeout or its embedding does not match the index
    /// dimensions.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredPassage>> {
        let embedding = self
            .embedder
            .embed(question, self.embedding_timeout)
            .await
            .inspect_err(|e| error!(error = %e, "query embedding failed"))?;

        let hits = self.index.search(&embedding, self.top_k, self.min_score).await?;
        debug!(hit_count = hits.len(), top_k = self.top_k, "retrieved passages");
        Ok(hits)
    }
}
