//! Gemini generation client using the Google Generative Language API.
//!
//! This module is only available when the `gemini` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::generator::Generator;

/// The default Generative Language API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default generation model.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// A [`Generator`] backed by the Gemini `generateContent` endpoint.
///
/// # Configuration
///
/// - `model`: defaults to `gemini-1.5-flash`.
/// - `api_key`: from the constructor or the `GEMINI_API_KEY` environment variable.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use newsbot_rag::GeminiGenerator;
///
/// let generator = GeminiGenerator::new("AI...")?;
/// let text = generator.generate("Summarize: ...", Duration::from_secs(30)).await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::SynthesisError("API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            model: DEFAULT_MODEL.into(),
        })
    }

    /// Create a new generator using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RagError::SynthesisError("GEMINI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the API base URL, mainly for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url: String = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Set the model name (e.g. `gemini-1.5-pro`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn call(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                RagError::SynthesisError(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "Gemini", %status, "API error");
            return Err(RagError::SynthesisError(format!("API returned {status}: {body}")));
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse response");
            RagError::SynthesisError(format!("failed to parse response: {e}"))
        })?;

        let text = generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(RagError::SynthesisError("model returned an empty response".into()));
        }
        Ok(text)
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

// ── Generator implementation ───────────────────────────────────────

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String> {
        debug!(
            provider = "Gemini",
            model = %self.model,
            prompt_len = prompt.len(),
            "generating completion"
        );

        match tokio::time::timeout(timeout, self.call(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                error!(provider = "Gemini", timeout_secs = timeout.as_secs(), "generation timed out");
                Err(RagError::SynthesisError(format!(
                    "generation timed out after {}s",
                    timeout.as_secs()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(GeminiGenerator::new("").is_err());
        assert!(GeminiGenerator::new("AIza-test").is_ok());
    }

    #[test]
    fn trims_trailing_slashes_from_base_url() {
        let generator = GeminiGenerator::new("AIza-test")
            .unwrap()
            .with_base_url("http://localhost:9090/v1beta/");
        assert_eq!(generator.base_url, "http://localhost:9090/v1beta");
    }
}
