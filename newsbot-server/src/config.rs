//! Server configuration from environment variables.

use anyhow::{Context, Result, bail};

/// Everything the server needs to start, read once at boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on, `NEWSBOT_BIND_ADDR`.
    pub bind_addr: String,
    /// Path to the JSON corpus file, `NEWSBOT_CORPUS_PATH`.
    pub corpus_path: String,
    /// Gemini API key, `GEMINI_API_KEY`. Required.
    pub gemini_api_key: String,
    /// Generation model override, `GEMINI_MODEL`.
    pub gemini_model: Option<String>,
    /// OpenAI API key, `OPENAI_API_KEY`. Required unless an embeddings
    /// base URL points at a keyless local server.
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible embeddings base URL, `EMBEDDINGS_BASE_URL`.
    pub embeddings_base_url: Option<String>,
    /// Embedding model override, `EMBEDDING_MODEL`.
    pub embedding_model: Option<String>,
    /// Embedding dimensions override, `EMBEDDING_DIMENSIONS`.
    pub embedding_dimensions: Option<usize>,
}

impl ServerConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;

        let openai_api_key = optional_var("OPENAI_API_KEY");
        let embeddings_base_url = optional_var("EMBEDDINGS_BASE_URL");
        if openai_api_key.is_none() && embeddings_base_url.is_none() {
            bail!("set OPENAI_API_KEY, or EMBEDDINGS_BASE_URL for a keyless local server");
        }

        let embedding_dimensions = match optional_var("EMBEDDING_DIMENSIONS") {
            Some(raw) => Some(
                raw.parse::<usize>()
                    .with_context(|| format!("invalid EMBEDDING_DIMENSIONS '{raw}'"))?,
            ),
            None => None,
        };

        Ok(Self {
            bind_addr: optional_var("NEWSBOT_BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:8005".to_string()),
            corpus_path: optional_var("NEWSBOT_CORPUS_PATH")
                .unwrap_or_else(|| "data/articles.json".to_string()),
            gemini_api_key,
            gemini_model: optional_var("GEMINI_MODEL"),
            openai_api_key,
            embeddings_base_url,
            embedding_model: optional_var("EMBEDDING_MODEL"),
            embedding_dimensions,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
