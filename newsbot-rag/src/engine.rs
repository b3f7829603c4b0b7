//! The news engine: corpus ingestion and question answering under one roof.

use std::fmt;
use std::sync::Arc;

use newsbot_session::SessionStore;
use tracing::{info, warn};

use crate::article::{Answer, Article, ArticleMeta, Query, ScoredPassage};
use crate::config::EngineConfig;
use crate::context::ContextBuilder;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generator::Generator;
use crate::index::{IndexEntry, VectorIndex};
use crate::ingest::Ingester;
use crate::retriever::Retriever;
use crate::synthesizer::Synthesizer;

/// Counts from one corpus ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusReport {
    /// Articles whose passages made it into the index.
    pub indexed_articles: usize,
    /// Total passages added to the index.
    pub indexed_passages: usize,
    /// Articles rejected during splitting, embedding, or indexing.
    pub skipped_articles: usize,
}

/// The assembled RAG pipeline: ingester, embedder, index, retriever,
/// synthesizer, and conversation context.
///
/// Build one with [`NewsEngine::builder`], feed it a corpus via
/// [`ingest_articles`](Self::ingest_articles), then answer questions with
/// [`ask`](Self::ask). The engine is cheap to share behind an `Arc`; all
/// methods take `&self`.
pub struct NewsEngine {
    config: EngineConfig,
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
    ingester: Ingester,
    retriever: Retriever,
    synthesizer: Synthesizer,
    context: ContextBuilder,
}

impl NewsEngine {
    /// Start building an engine.
    pub fn builder() -> NewsEngineBuilder {
        NewsEngineBuilder::default()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The embedder the engine was built with.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// The vector index backing retrieval.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Split, embed, and index a batch of articles.
    ///
    /// Articles are processed one at a time; a failure in any stage skips
    /// that article and moves on, so one bad article never sinks a corpus.
    /// Queries keep running against the existing index while ingestion is
    /// in flight, and each article's passages are published atomically.
    pub async fn ingest_articles(&self, articles: &[Article]) -> Result<CorpusReport> {
        let mut report = CorpusReport::default();
        let timeout = self.config.embedding_timeout;

        for article in articles {
            let passages = match self.ingester.split_article(article) {
                Ok(passages) => passages,
                Err(e) => {
                    warn!(article.id = %article.id, error = %e, "skipping article: split failed");
                    report.skipped_articles += 1;
                    continue;
                }
            };

            let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
            let embeddings = match self.embedder.embed_batch(&texts, timeout).await {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    warn!(article.id = %article.id, error = %e, "skipping article: embedding failed");
                    report.skipped_articles += 1;
                    continue;
                }
            };

            let source = ArticleMeta::of(article);
            let batch: Vec<IndexEntry> = passages
                .into_iter()
                .zip(embeddings)
                .map(|(passage, embedding)| IndexEntry {
                    passage,
                    source: source.clone(),
                    embedding,
                })
                .collect();

            let added = batch.len();
            match self.index.add(batch).await {
                Ok(()) => {
                    report.indexed_articles += 1;
                    report.indexed_passages += added;
                }
                Err(e) => {
                    warn!(article.id = %article.id, error = %e, "skipping article: indexing failed");
                    report.skipped_articles += 1;
                }
            }
        }

        info!(
            indexed_articles = report.indexed_articles,
            indexed_passages = report.indexed_passages,
            skipped_articles = report.skipped_articles,
            "corpus ingested"
        );
        Ok(report)
    }

    /// The passages most relevant to `question`, best first.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredPassage>> {
        self.retriever.retrieve(question).await
    }

    /// Answer a query using retrieved passages and session context.
    ///
    /// The session history is fetched fresh on every call. Recording the
    /// exchange back into the session store is the caller's job, typically
    /// done at the request boundary once the answer is delivered.
    pub async fn ask(&self, query: &Query) -> Result<Answer> {
        let turns = self.context.recent_turns(&query.session_id).await?;
        let hits = self.retriever.retrieve(&query.text).await?;

        info!(
            session_id = %query.session_id,
            hit_count = hits.len(),
            context_turns = turns.len(),
            "answering query"
        );

        self.synthesizer.synthesize(&query.text, &hits, &turns).await
    }
}

/// Builder for [`NewsEngine`].
///
/// The embedder, generator, and session store are required; the
/// configuration defaults to [`EngineConfig::default`].
#[derive(Default)]
pub struct NewsEngineBuilder {
    config: Option<EngineConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    generator: Option<Arc<dyn Generator>>,
    session_store: Option<Arc<dyn SessionStore>>,
}

impl NewsEngineBuilder {
    /// Use this configuration instead of the defaults.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding backend.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generation backend.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the session store backing conversation context.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Assemble the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required component is missing
    /// or the embedder reports zero dimensions.
    pub fn build(self) -> Result<NewsEngine> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("an embedder is required".into()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::ConfigError("a generator is required".into()))?;
        let session_store = self
            .session_store
            .ok_or_else(|| RagError::ConfigError("a session store is required".into()))?;

        let dimensions = embedder.dimensions();
        if dimensions == 0 {
            return Err(RagError::ConfigError("embedder reports zero dimensions".into()));
        }

        let index = Arc::new(VectorIndex::new(dimensions));
        let ingester = Ingester::new(&config);
        let retriever = Retriever::new(Arc::clone(&embedder), Arc::clone(&index), &config);
        let synthesizer = Synthesizer::new(Arc::clone(&generator), &config);
        let context =
            ContextBuilder::new(session_store, config.context_turns, config.context_char_budget);

        Ok(NewsEngine { config, embedder, index, ingester, retriever, synthesizer, context })
    }
}
