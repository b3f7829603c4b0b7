use std::sync::Arc;

use anyhow::Context;
use newsbot_rag::{GeminiGenerator, NewsEngine, OpenAiEmbedder, read_articles};
use newsbot_server::{AppState, ServerConfig, run_server};
use newsbot_session::InMemorySessionStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let mut embedder = match (&config.openai_api_key, &config.embeddings_base_url) {
        (Some(key), Some(base_url)) => {
            OpenAiEmbedder::new(key.clone())?.with_base_url(base_url.clone())
        }
        (Some(key), None) => OpenAiEmbedder::new(key.clone())?,
        (None, Some(base_url)) => OpenAiEmbedder::local(base_url.clone()),
        (None, None) => anyhow::bail!("set OPENAI_API_KEY or EMBEDDINGS_BASE_URL"),
    };
    if let Some(model) = &config.embedding_model {
        embedder = embedder.with_model(model.clone());
    }
    if let Some(dims) = config.embedding_dimensions {
        embedder = embedder.with_dimensions(dims);
    }

    let mut generator = GeminiGenerator::new(config.gemini_api_key.clone())?;
    if let Some(model) = &config.gemini_model {
        generator = generator.with_model(model.clone());
    }

    let store = Arc::new(InMemorySessionStore::default());
    let engine = NewsEngine::builder()
        .embedder(Arc::new(embedder))
        .generator(Arc::new(generator))
        .session_store(store.clone())
        .build()?;

    let articles = read_articles(&config.corpus_path)
        .with_context(|| format!("failed to load corpus from {}", config.corpus_path))?;
    info!(article_count = articles.len(), path = %config.corpus_path, "loaded corpus");

    let report = engine.ingest_articles(&articles).await?;
    info!(
        indexed_articles = report.indexed_articles,
        indexed_passages = report.indexed_passages,
        skipped_articles = report.skipped_articles,
        "corpus ready"
    );

    let state = AppState { engine: Arc::new(engine), store };
    run_server(&config, state).await
}
