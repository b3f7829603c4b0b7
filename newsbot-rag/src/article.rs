//! Data types for articles, passages, and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article as loaded from the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Unique identifier for the article. Corpus files may omit it; the
    /// loader fills in a positional id.
    #[serde(default)]
    pub id: String,
    /// The headline. Corpus records may omit it.
    #[serde(default)]
    pub title: String,
    /// Where the article was published. Corpus records may omit it.
    #[serde(default, alias = "link")]
    pub url: String,
    /// Publication time, when the corpus records one.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    /// The full body text. Corpus files name this field inconsistently;
    /// records that omit it parse with an empty body and are rejected by
    /// the splitter's junk filter.
    #[serde(default, rename = "content", alias = "text", alias = "body")]
    pub raw_text: String,
}

impl Article {
    /// Create an article with the given id, title, url, and body text.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            published_at: None,
            raw_text: raw_text.into(),
        }
    }
}

/// A bounded chunk of an article's text, the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Unique identifier, `{article_id}:{ordinal}`.
    pub id: String,
    /// The article this passage was cut from.
    pub article_id: String,
    /// The passage text. Never empty once indexed.
    pub text: String,
    /// Zero-based position of this passage within its article.
    pub ordinal: usize,
}

/// The article metadata snapshot carried alongside each indexed passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleMeta {
    /// The headline.
    pub title: String,
    /// Where the article was published.
    pub url: String,
}

impl ArticleMeta {
    /// Snapshot the metadata of an article.
    pub fn of(article: &Article) -> Self {
        Self { title: article.title.clone(), url: article.url.clone() }
    }
}

/// A user question addressed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The question text.
    pub text: String,
    /// The conversation this question belongs to.
    pub session_id: String,
}

impl Query {
    /// Create a query for the given session.
    pub fn new(text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self { text: text.into(), session_id: session_id.into() }
    }
}

/// A retrieved passage paired with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    /// The retrieved passage.
    pub passage: Passage,
    /// Metadata of the article the passage came from.
    pub source: ArticleMeta,
    /// Cosine similarity between the query and the passage, in `[-1, 1]`.
    /// Higher is more relevant.
    pub score: f32,
}

/// A cited source parsed out of a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// Human-readable label, usually the article headline.
    pub title: String,
    /// Link to the article, normalized to carry a scheme. Absent when the
    /// model cited a title without a url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The engine's answer to a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The generated answer text, without the source listing.
    pub summary: String,
    /// The sources the model cited, in the order it listed them.
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_round_trips_through_json() {
        let answer = Answer {
            summary: "Rates rose.".to_string(),
            sources: vec![
                Source {
                    title: "Fed Report".to_string(),
                    url: Some("https://example.com/a".to_string()),
                },
                Source { title: "Background Briefing".to_string(), url: None },
            ],
        };
        let json = serde_json::to_string(&answer).unwrap();
        let back: Answer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answer);
    }

    #[test]
    fn source_without_url_omits_the_field() {
        let source = Source { title: "Fed Report".to_string(), url: None };
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"title":"Fed Report"}"#);
    }

    #[test]
    fn article_accepts_corpus_field_aliases() {
        let json = r#"{
            "title": "Fed raises rates",
            "link": "https://example.com/fed",
            "body": "The Federal Reserve raised interest rates."
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.url, "https://example.com/fed");
        assert_eq!(article.raw_text, "The Federal Reserve raised interest rates.");
        assert!(article.id.is_empty());
        assert!(article.published_at.is_none());
    }

    #[test]
    fn article_fields_default_to_empty_when_absent() {
        let article: Article = serde_json::from_str(r#"{"content": "Body text."}"#).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.url, "");
        assert_eq!(article.raw_text, "Body text.");
    }
}
