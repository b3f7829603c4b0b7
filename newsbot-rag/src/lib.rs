//! Retrieval-augmented news question answering.
//!
//! This crate provides:
//! - Corpus ingestion: splitting articles into overlapping passages
//! - Embedding providers behind the [`Embedder`] trait (OpenAI included)
//! - An in-memory cosine-similarity [`VectorIndex`]
//! - Threshold-filtered top-k retrieval
//! - Answer synthesis with cited sources via a [`Generator`] (Gemini included)
//! - Conversation context from a pluggable session store
//!
//! The pieces assemble into a [`NewsEngine`]:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use newsbot_rag::{NewsEngine, OpenAiEmbedder, GeminiGenerator, read_articles};
//! use newsbot_session::InMemorySessionStore;
//!
//! let engine = NewsEngine::builder()
//!     .embedder(Arc::new(OpenAiEmbedder::from_env()?))
//!     .generator(Arc::new(GeminiGenerator::from_env()?))
//!     .session_store(Arc::new(InMemorySessionStore::default()))
//!     .build()?;
//!
//! let articles = read_articles("data/articles.json")?;
//! engine.ingest_articles(&articles).await?;
//! ```

mod article;
mod config;
mod context;
mod embedding;
mod engine;
mod error;
#[cfg(feature = "gemini")]
mod gemini;
mod generator;
mod index;
mod ingest;
#[cfg(feature = "openai")]
mod openai;
mod retriever;
mod synthesizer;

pub use article::{Answer, Article, ArticleMeta, Passage, Query, ScoredPassage, Source};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use context::ContextBuilder;
pub use embedding::{Embedder, require_text, validate_batch};
pub use engine::{CorpusReport, NewsEngine, NewsEngineBuilder};
pub use error::{RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;
pub use generator::Generator;
pub use index::{IndexEntry, VectorIndex};
pub use ingest::{IngestReport, Ingester, normalize_text, read_articles};
#[cfg(feature = "openai")]
pub use openai::OpenAiEmbedder;
pub use retriever::Retriever;
pub use synthesizer::{NO_SOURCES_FALLBACK, Synthesizer, parse_answer};
