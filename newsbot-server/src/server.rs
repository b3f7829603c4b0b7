//! HTTP surface: routes, handlers, and server startup.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use newsbot_rag::{Answer, NewsEngine, Query, RagError, Source};
use newsbot_session::{ConversationTurn, SessionStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// The answer returned when generation fails outright.
pub const FALLBACK_ANSWER: &str =
    "Sorry, I couldn't generate an answer right now. Please try again.";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<NewsEngine>,
    pub store: Arc<dyn SessionStore>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ConversationTurn>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/history/{session_id}", get(history).delete(clear_history))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("newsbot listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "service": "newsbot-server"}))
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query cannot be empty".to_string()));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let query = Query::new(request.query.clone(), session_id.clone());
    let answer = match state.engine.ask(&query).await {
        Ok(answer) => answer,
        Err(e @ RagError::SynthesisError(_)) => {
            warn!(session_id = %session_id, error = %e, "synthesis failed, falling back");
            Answer { summary: FALLBACK_ANSWER.to_string(), sources: Vec::new() }
        }
        Err(e) => return Err(ApiError::internal(e)),
    };

    record_exchange(&state, &session_id, &request.query, &answer.summary).await;

    Ok(Json(AskResponse {
        session_id,
        answer: answer.summary,
        sources: answer.sources,
    }))
}

/// Record the exchange once the answer exists. Context for this query must
/// not include the query itself, so this runs after `ask`, not before.
/// A store failure loses history but never the answer.
async fn record_exchange(state: &AppState, session_id: &str, question: &str, answer: &str) {
    if let Err(e) = state.store.append(session_id, ConversationTurn::user(question)).await {
        warn!(session_id = %session_id, error = %e, "failed to record user turn");
    }
    if let Err(e) = state.store.append(session_id, ConversationTurn::bot(answer)).await {
        warn!(session_id = %session_id, error = %e, "failed to record bot turn");
    }
}

async fn history(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let turns = state.store.list(&session_id).await.map_err(ApiError::internal)?;
    Ok(Json(HistoryResponse { history: turns }))
}

async fn clear_history(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.clear(&session_id).await.map_err(ApiError::internal)?;
    info!(session_id = %session_id, "session cleared");
    Ok(Json(json!({ "message": "Session cleared" })))
}
