//! Corpus ingestion: loading articles and splitting them into passages.

use std::path::Path;

use tracing::{debug, warn};

use crate::article::{Article, Passage};
use crate::config::EngineConfig;
use crate::error::{RagError, Result};

/// The outcome of splitting a batch of articles.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Passages produced from the accepted articles.
    pub passages: Vec<Passage>,
    /// Number of articles rejected and skipped.
    pub skipped: usize,
}

/// Splits articles into overlapping fixed-size passages.
///
/// Splitting is deterministic: the same article and configuration always
/// produce the same passage ids and texts, so re-ingesting a corpus yields
/// identical passages.
#[derive(Debug, Clone)]
pub struct Ingester {
    passage_size: usize,
    passage_overlap: usize,
    min_article_chars: usize,
}

impl Ingester {
    /// Create an ingester from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            passage_size: config.passage_size,
            passage_overlap: config.passage_overlap,
            min_article_chars: config.min_article_chars,
        }
    }

    /// Split every article in the batch, skipping malformed ones.
    ///
    /// A rejected article is logged and counted in the report; it never
    /// aborts the rest of the batch.
    pub fn ingest(&self, articles: &[Article]) -> IngestReport {
        let mut report = IngestReport::default();
        for article in articles {
            match self.split_article(article) {
                Ok(passages) => report.passages.extend(passages),
                Err(e) => {
                    warn!(article.id = %article.id, error = %e, "skipping article");
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Split a single article into passages.
    ///
    /// The body is whitespace-normalized, then cut into windows of at most
    /// `passage_size` characters with `passage_overlap` characters shared
    /// between consecutive windows. Windows are counted in `char`s, so
    /// multi-byte text splits cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IngestError`] if the body is empty or shorter
    /// than the junk threshold.
    pub fn split_article(&self, article: &Article) -> Result<Vec<Passage>> {
        let text = normalize_text(&article.raw_text);
        if text.is_empty() {
            return Err(RagError::IngestError {
                article_id: article.id.clone(),
                reason: "article body is empty".to_string(),
            });
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() < self.min_article_chars {
            return Err(RagError::IngestError {
                article_id: article.id.clone(),
                reason: format!(
                    "article body has {} characters, below the {}-character junk threshold",
                    chars.len(),
                    self.min_article_chars
                ),
            });
        }

        let step = self.passage_size.saturating_sub(self.passage_overlap).max(1);
        let mut passages = Vec::new();
        let mut start = 0;
        let mut ordinal = 0;

        while start < chars.len() {
            let end = (start + self.passage_size).min(chars.len());
            let passage_text: String = chars[start..end].iter().collect();
            passages.push(Passage {
                id: format!("{}:{ordinal}", article.id),
                article_id: article.id.clone(),
                text: passage_text,
                ordinal,
            });
            ordinal += 1;
            if end == chars.len() {
                break;
            }
            start += step;
        }

        debug!(article.id = %article.id, passage_count = passages.len(), "split article");
        Ok(passages)
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Scraped news bodies arrive with arbitrary newline and tab placement;
/// retrieval only cares about the words.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Load a JSON corpus file: an array of articles.
///
/// Records that do not fit the article shape are skipped with a warning
/// rather than failing the batch; absent `title`/`url`/body fields parse
/// as empty strings, and bodyless records are later rejected by the
/// splitter's junk filter. Articles without an `id` get a positional one
/// (`article-0`, `article-1`, ...) matching their record's position in
/// the file.
///
/// # Errors
///
/// Returns [`RagError::CorpusError`] if the file cannot be read or does
/// not hold a JSON array.
pub fn read_articles(path: impl AsRef<Path>) -> Result<Vec<Article>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .map_err(|e| RagError::CorpusError(format!("failed to read '{}': {e}", path.display())))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&data)
        .map_err(|e| RagError::CorpusError(format!("failed to parse '{}': {e}", path.display())))?;

    let mut articles = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Article>(record) {
            Ok(mut article) => {
                if article.id.is_empty() {
                    article.id = format!("article-{idx}");
                }
                articles.push(article);
            }
            Err(e) => warn!(record = idx, error = %e, "skipping malformed corpus record"),
        }
    }
    Ok(articles)
}
