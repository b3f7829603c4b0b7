//! Mock-server tests for the OpenAI embedding and Gemini generation clients.

#![cfg(all(feature = "openai", feature = "gemini"))]

use std::time::Duration;

use newsbot_rag::{Embedder, GeminiGenerator, Generator, OpenAiEmbedder, RagError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a successful embeddings response for the given vectors.
async fn setup_embeddings_endpoint(server: &MockServer, vectors: &[Vec<f32>]) {
    let data: Vec<_> = vectors
        .iter()
        .enumerate()
        .map(|(index, embedding)| json!({ "index": index, "embedding": embedding }))
        .collect();

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn embed_batch_returns_vectors_in_order() {
    let server = MockServer::start().await;
    setup_embeddings_endpoint(&server, &[vec![1.0, 0.0], vec![0.0, 1.0]]).await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri())).with_dimensions(2);
    let embeddings = embedder
        .embed_batch(&["first text", "second text"], Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn embed_uses_the_first_vector_of_the_batch() {
    let server = MockServer::start().await;
    setup_embeddings_endpoint(&server, &[vec![0.5, 0.5]]).await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri())).with_dimensions(2);
    let embedding = embedder.embed("some text", Duration::from_secs(5)).await.unwrap();

    assert_eq!(embedding, vec![0.5, 0.5]);
}

#[tokio::test]
async fn api_errors_carry_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "rate limited" } })),
        )
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri()));
    let err = embedder.embed_batch(&["text"], Duration::from_secs(5)).await.unwrap_err();

    match err {
        RagError::EmbeddingError { message, .. } => {
            assert!(message.contains("rate limited"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_batch_inputs_are_rejected_before_any_request() {
    let server = MockServer::start().await;
    setup_embeddings_endpoint(&server, &[vec![1.0]]).await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri()));
    let err = embedder
        .embed_batch(&["fine", "", "also fine", "  "], Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        RagError::EmbeddingBatchError { failed_indices, .. } => {
            assert_eq!(failed_indices, vec![1, 3]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_short_response_is_an_error_not_a_silent_mismatch() {
    let server = MockServer::start().await;
    setup_embeddings_endpoint(&server, &[vec![1.0, 0.0]]).await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri()));
    let err = embedder.embed_batch(&["one", "two"], Duration::from_secs(5)).await.unwrap_err();

    match err {
        RagError::EmbeddingError { message, .. } => {
            assert!(message.contains("1 embeddings for 2 inputs"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_embedding_requests_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "data": [{ "index": 0, "embedding": [1.0, 0.0] }] })),
        )
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedder::local(format!("{}/v1", server.uri()));
    let err = embedder.embed_batch(&["text"], Duration::from_millis(50)).await.unwrap_err();

    match err {
        RagError::EmbeddingError { message, .. } => {
            assert!(message.contains("timed out"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Gemini ─────────────────────────────────────────────────────────

fn gemini_against(server: &MockServer) -> GeminiGenerator {
    GeminiGenerator::new("test-key")
        .unwrap()
        .with_base_url(format!("{}/v1beta", server.uri()))
}

#[tokio::test]
async fn generate_returns_the_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Rates rose.\nSources:\n- Fed Report - example.com/a" }],
                    "role": "model"
                }
            }]
        })))
        .mount(&server)
        .await;

    let generator = gemini_against(&server);
    let text = generator.generate("prompt", Duration::from_secs(5)).await.unwrap();

    assert!(text.starts_with("Rates rose."));
}

#[tokio::test]
async fn slow_generation_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                })),
        )
        .mount(&server)
        .await;

    let generator = gemini_against(&server);
    let err = generator.generate("prompt", Duration::from_millis(50)).await.unwrap_err();

    match err {
        RagError::SynthesisError(message) => {
            assert!(message.contains("timed out"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn an_empty_candidate_list_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let generator = gemini_against(&server);
    let err = generator.generate("prompt", Duration::from_secs(5)).await.unwrap_err();

    match err {
        RagError::SynthesisError(message) => {
            assert!(message.contains("empty response"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn gemini_api_errors_surface_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({
                "error": { "message": "API key not valid" }
            })),
        )
        .mount(&server)
        .await;

    let generator = gemini_against(&server);
    let err = generator.generate("prompt", Duration::from_secs(5)).await.unwrap_err();

    match err {
        RagError::SynthesisError(message) => {
            assert!(message.contains("403"), "message was: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
