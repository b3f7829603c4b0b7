//! Answer synthesis: prompt assembly and response parsing.
//!
//! The synthesizer turns retrieved passages and recent conversation turns
//! into one prompt, hands it to a [`Generator`], and parses the completion
//! into a structured [`Answer`] with cited sources.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use newsbot_session::{ConversationTurn, Role};
use regex::Regex;
use tracing::debug;

use crate::article::{Answer, ScoredPassage, Source};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::generator::Generator;

/// Marks the start of the source list in a model completion.
const SOURCES_MARKER: &str = "Sources:";

/// Leading bullet decoration on a source line.
static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s*\-•]+").expect("unreachable error: invalid bullet prefix pattern")
});

/// The answer returned when no passage clears the relevance threshold.
pub const NO_SOURCES_FALLBACK: &str =
    "Sorry, I couldn't find any relevant news articles for that question.";

/// Builds prompts and parses model completions into answers.
pub struct Synthesizer {
    generator: Arc<dyn Generator>,
    snippet_chars: usize,
    generation_timeout: Duration,
}

impl Synthesizer {
    /// Create a synthesizer over the given generation backend.
    pub fn new(generator: Arc<dyn Generator>, config: &EngineConfig) -> Self {
        Self {
            generator,
            snippet_chars: config.snippet_chars,
            generation_timeout: config.generation_timeout,
        }
    }

    /// Produce an answer for `question` from the retrieved passages.
    ///
    /// With no passages the canned [`NO_SOURCES_FALLBACK`] answer comes back
    /// immediately and the model is never called.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SynthesisError`] if the model call fails or
    /// times out; the caller decides how to degrade.
    ///
    /// [`RagError::SynthesisError`]: crate::error::RagError::SynthesisError
    pub async fn synthesize(
        &self,
        question: &str,
        hits: &[ScoredPassage],
        turns: &[ConversationTurn],
    ) -> Result<Answer> {
        if hits.is_empty() {
            debug!("no passages met the relevance threshold, returning fallback answer");
            return Ok(Answer { summary: NO_SOURCES_FALLBACK.to_string(), sources: Vec::new() });
        }

        let prompt = self.build_prompt(question, hits, turns);
        debug!(prompt_len = prompt.len(), hit_count = hits.len(), "synthesizing answer");

        let raw = self.generator.generate(&prompt, self.generation_timeout).await?;
        Ok(parse_answer(&raw))
    }

    fn build_prompt(
        &self,
        question: &str,
        hits: &[ScoredPassage],
        turns: &[ConversationTurn],
    ) -> String {
        let mut prompt = String::from(
            "You are a helpful news assistant. Answer the user's question using only the news \
             articles below. For each article, write two or three sentences summarizing its \
             key point, then add a short 'Final Note' synthesizing across all articles. End \
             with a \"Sources:\" section listing each article you used, one per line, as \
             \"<title> - <url>\".\n",
        );

        if !turns.is_empty() {
            prompt.push_str("\nConversation so far:\n");
            for turn in turns {
                let speaker = match turn.role {
                    Role::User => "User",
                    Role::Bot => "Bot",
                };
                prompt.push_str(&format!("{speaker}: {}\n", turn.text));
            }
        }

        prompt.push_str("\nHere are the relevant articles:\n");
        for (i, hit) in hits.iter().enumerate() {
            prompt.push_str(&format!(
                "\nArticle {}:\nTitle: {}\nURL: {}\nSnippet: {}\n",
                i + 1,
                hit.source.title,
                hit.source.url,
                snippet_of(&hit.passage.text, self.snippet_chars)
            ));
        }

        prompt.push_str(&format!("\nQuestion: {question}\n"));
        prompt
    }
}

/// Flatten a passage to a single line and cap its length in characters.
fn snippet_of(text: &str, max_chars: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        flat.chars().take(max_chars).collect()
    }
}

/// Parse a model completion into a summary and its cited sources.
///
/// Everything before the first `Sources:` marker is the summary; each
/// non-empty line after it becomes one [`Source`]. Without a marker the
/// whole completion is the summary. Parsing never fails; a malformed
/// source list just yields fewer sources.
pub fn parse_answer(raw: &str) -> Answer {
    match raw.find(SOURCES_MARKER) {
        Some(pos) => {
            let summary = raw[..pos].trim().to_string();
            let block = &raw[pos + SOURCES_MARKER.len()..];
            let sources = block.lines().filter_map(parse_source_line).collect();
            Answer { summary, sources }
        }
        None => Answer { summary: raw.trim().to_string(), sources: Vec::new() },
    }
}

/// Parse one source line, tolerating bullet decoration.
///
/// A line splits on `" - "`; when the last segment is a URL, everything
/// before it is the title. Titles may themselves contain `" - "`. A bare
/// URL becomes its own title; anything else is kept as a title without a
/// URL rather than dropped.
fn parse_source_line(line: &str) -> Option<Source> {
    let cleaned = BULLET_PREFIX.replace(line, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let segments: Vec<&str> = cleaned.split(" - ").collect();
    if segments.len() >= 2 {
        let candidate = segments[segments.len() - 1].trim();
        if looks_like_url(candidate) {
            let title = segments[..segments.len() - 1].join(" - ").trim().to_string();
            let title = if title.is_empty() { candidate.to_string() } else { title };
            return Some(Source { title, url: Some(ensure_scheme(candidate)) });
        }
    }

    if looks_like_url(cleaned) {
        return Some(Source {
            title: cleaned.to_string(),
            url: Some(ensure_scheme(cleaned)),
        });
    }

    Some(Source { title: cleaned.to_string(), url: None })
}

/// Loose URL check: a scheme prefix, or a dotted host with no whitespace.
fn looks_like_url(s: &str) -> bool {
    if s.is_empty() || s.contains(char::is_whitespace) {
        return false;
    }
    if s.starts_with("http://") || s.starts_with("https://") {
        return true;
    }
    let host = s.split('/').next().unwrap_or(s);
    host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}

/// Prefix `https://` unless the URL already carries a scheme.
fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
