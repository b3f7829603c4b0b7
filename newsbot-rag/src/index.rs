//! In-memory vector index using cosine similarity.
//!
//! This module provides [`VectorIndex`], a flat in-memory index backed by a
//! `Vec` protected by a `tokio::sync::RwLock`. Entries keep their insertion
//! order, which makes equal-score search results deterministic.

use tokio::sync::RwLock;
use tracing::debug;

use crate::article::{ArticleMeta, Passage, ScoredPassage};
use crate::error::{RagError, Result};

/// One indexed passage: text, its source article, and its embedding.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// The passage itself.
    pub passage: Passage,
    /// Title and URL of the article the passage came from.
    pub source: ArticleMeta,
    /// Embedding of the passage text; must match the index dimensions.
    pub embedding: Vec<f32>,
}

/// An in-memory vector index using cosine similarity for search.
///
/// All entries share one fixed dimensionality, checked at insert time.
/// Writes take the write half of a `tokio::sync::RwLock`, so searches keep
/// running against the previous contents until a batch is published in full.
/// A search scans every entry; that is plenty for a corpus of news passages
/// and keeps the index free of ANN tuning.
///
/// # Example
///
/// ```rust,ignore
/// use newsbot_rag::VectorIndex;
///
/// let index = VectorIndex::new(1536);
/// index.add(entries).await?;
/// let hits = index.search(&query_embedding, 5, 0.2).await?;
/// ```
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, entries: RwLock::new(Vec::new()) }
    }

    /// The dimensionality every entry must have.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of entries currently in the index.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Add a batch of entries.
    ///
    /// The whole batch is validated before anything is stored: one bad entry
    /// rejects the batch and leaves the index exactly as it was. Readers
    /// never observe a partially added batch.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if an embedding has the wrong
    /// length, or [`RagError::IndexError`] if a passage has empty text.
    pub async fn add(&self, batch: Vec<IndexEntry>) -> Result<()> {
        for entry in &batch {
            if entry.embedding.len() != self.dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: entry.embedding.len(),
                });
            }
            if entry.passage.text.trim().is_empty() {
                return Err(RagError::IndexError(format!(
                    "passage '{}' has empty text",
                    entry.passage.id
                )));
            }
        }

        let mut entries = self.entries.write().await;
        let added = batch.len();
        entries.extend(batch);
        debug!(added, total = entries.len(), "published index entries");
        Ok(())
    }

    /// Find the `top_k` most similar entries scoring at least `min_score`.
    ///
    /// Results are sorted by cosine similarity, best first; entries with
    /// equal scores come back in insertion order. Scores lie in `[-1, 1]`.
    /// The matches are cloned out, so no lock is held once this returns.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query embedding has
    /// the wrong length.
    pub async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredPassage>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredPassage> = entries
            .iter()
            .filter_map(|entry| {
                let score = cosine_similarity(&entry.embedding, embedding);
                (score >= min_score).then(|| ScoredPassage {
                    passage: entry.passage.clone(),
                    source: entry.source.clone(),
                    score,
                })
            })
            .collect();

        // Stable sort: entries with equal scores stay in insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
