//! Error types for the `newsbot-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting, retrieving, or answering.
#[derive(Debug, Error)]
pub enum RagError {
    /// A source article could not be turned into passages.
    #[error("Ingest error for article '{article_id}': {reason}")]
    IngestError {
        /// The article that was rejected.
        article_id: String,
        /// A description of the failure.
        reason: String,
    },

    /// The corpus file could not be read or parsed.
    #[error("Corpus error: {0}")]
    CorpusError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A batch embedding request contained empty items.
    #[error("Embedding batch rejected ({provider}): empty input at indices {failed_indices:?}")]
    EmbeddingBatchError {
        /// The embedding provider that rejected the batch.
        provider: String,
        /// Zero-based positions of the empty batch items.
        failed_indices: Vec<usize>,
    },

    /// An entry or query embedding had the wrong dimension.
    #[error("Dimension mismatch: index holds {expected}-dimensional embeddings, got {actual}")]
    DimensionMismatch {
        /// The dimension the index was created with.
        expected: usize,
        /// The dimension of the offending embedding.
        actual: usize,
    },

    /// An error occurred in the vector index.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Answer generation failed or timed out.
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    /// An error propagated from the session store.
    #[error(transparent)]
    SessionError(#[from] newsbot_session::SessionError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval and answering operations.
pub type Result<T> = std::result::Result<T, RagError>;
