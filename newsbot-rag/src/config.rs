//! Configuration for the answering engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tunable parameters for ingestion, retrieval, and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Maximum passage size in characters.
    pub passage_size: usize,
    /// Number of overlapping characters between consecutive passages.
    pub passage_overlap: usize,
    /// Articles with fewer body characters than this are skipped as junk.
    pub min_article_chars: usize,
    /// Number of top passages to retrieve per query.
    pub top_k: usize,
    /// Minimum cosine similarity for retrieved passages.
    pub min_score: f32,
    /// Maximum number of recent conversation turns carried into the prompt.
    pub context_turns: usize,
    /// Maximum total characters of conversation context in the prompt.
    pub context_char_budget: usize,
    /// Passage text is capped at this many characters in the prompt.
    pub snippet_chars: usize,
    /// How long a single embedding call may take.
    pub embedding_timeout: Duration,
    /// How long a single generation call may take.
    pub generation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            passage_size: 500,
            passage_overlap: 50,
            min_article_chars: 200,
            top_k: 5,
            min_score: 0.2,
            context_turns: 6,
            context_char_budget: 2000,
            snippet_chars: 600,
            embedding_timeout: Duration::from_secs(30),
            generation_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Create a new builder for constructing an [`EngineConfig`].
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the maximum passage size in characters.
    pub fn passage_size(mut self, size: usize) -> Self {
        self.config.passage_size = size;
        self
    }

    /// Set the overlap between consecutive passages in characters.
    pub fn passage_overlap(mut self, overlap: usize) -> Self {
        self.config.passage_overlap = overlap;
        self
    }

    /// Set the junk threshold: articles with fewer body characters are skipped.
    pub fn min_article_chars(mut self, chars: usize) -> Self {
        self.config.min_article_chars = chars;
        self
    }

    /// Set the number of top passages to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum cosine similarity for retrieved passages.
    pub fn min_score(mut self, score: f32) -> Self {
        self.config.min_score = score;
        self
    }

    /// Set the maximum number of conversation turns carried into the prompt.
    pub fn context_turns(mut self, turns: usize) -> Self {
        self.config.context_turns = turns;
        self
    }

    /// Set the character budget for conversation context in the prompt.
    pub fn context_char_budget(mut self, chars: usize) -> Self {
        self.config.context_char_budget = chars;
        self
    }

    /// Set the per-passage snippet cap used when building prompts.
    pub fn snippet_chars(mut self, chars: usize) -> Self {
        self.config.snippet_chars = chars;
        self
    }

    /// Set the embedding timeout.
    pub fn embedding_timeout(mut self, timeout: Duration) -> Self {
        self.config.embedding_timeout = timeout;
        self
    }

    /// Set the generation timeout.
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.config.generation_timeout = timeout;
        self
    }

    /// Build the [`EngineConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `passage_overlap >= passage_size`
    /// - `top_k == 0`
    /// - `min_score` is outside `[-1, 1]`
    pub fn build(self) -> Result<EngineConfig> {
        if self.config.passage_overlap >= self.config.passage_size {
            return Err(RagError::ConfigError(format!(
                "passage_overlap ({}) must be less than passage_size ({})",
                self.config.passage_overlap, self.config.passage_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.config.min_score) {
            return Err(RagError::ConfigError(format!(
                "min_score ({}) must be within [-1, 1]",
                self.config.min_score
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overlap_must_be_smaller_than_passage_size() {
        let err = EngineConfig::builder().passage_size(100).passage_overlap(100).build();
        assert!(err.is_err());
    }

    #[test]
    fn top_k_must_be_positive() {
        let err = EngineConfig::builder().top_k(0).build();
        assert!(err.is_err());
    }

    #[test]
    fn min_score_must_be_a_valid_cosine() {
        assert!(EngineConfig::builder().min_score(1.5).build().is_err());
        assert!(EngineConfig::builder().min_score(-0.5).build().is_ok());
    }
}
