//! REST API server for the financial assistant
//!
//! Stateless ask + product listing, plus a session-scoped chat surface whose
//! transcripts live in memory for the lifetime of the process.

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::advisor::AdvisorGateway;
use crate::memory::{resolve_session_id, SessionStore, Turn};
use crate::models::{Product, ProductFilter};
use crate::prompts::GENERIC_FAILURE;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
}

/// Raw query values. Blank or non-numeric amounts count as absent, so
/// listing never fails on a filter value.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub risk_level: Option<String>,
    pub max_investment: Option<String>,
    /// Older clients send the ceiling under this name
    pub min_investment: Option<String>,
}

fn parse_amount(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
}

impl ProductQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            risk_level: self.risk_level.filter(|r| !r.is_empty()),
            max_investment: parse_amount(self.max_investment.as_deref())
                .or_else(|| parse_amount(self.min_investment.as_deref())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub chat_id: Option<String>,
    pub message: String,
}

/// =============================
/// Response Models
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub chat_id: String,
    pub response: String,
    pub turns: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptReply {
    pub chat_id: String,
    pub turns: Vec<Turn>,
}

type JsonReply = (StatusCode, Json<Value>);

fn error_reply(status: StatusCode, message: &str) -> JsonReply {
    (status, Json(json!({ "error": message })))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub advisor: AdvisorGateway,
    pub sessions: Arc<SessionStore>,
    pub ask_timeout: Duration,
    pub model: String,
}

impl ApiState {
    pub fn new(advisor: AdvisorGateway, model: impl Into<String>, ask_timeout: Duration) -> Self {
        Self {
            advisor,
            sessions: Arc::new(SessionStore::new()),
            ask_timeout,
            model: model.into(),
        }
    }

    /// Replace the chat store with one capped at `max_sessions`.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.sessions = Arc::new(SessionStore::with_max_sessions(max_sessions));
        self
    }
}

/// Run one ask under the configured timeout, collapsing every failure into
/// the generic message. The cause is only logged.
async fn guarded_ask<F>(timeout: Duration, ask: F) -> Result<String, JsonReply>
where
    F: Future<Output = crate::Result<String>>,
{
    match tokio::time::timeout(timeout, ask).await {
        Ok(Ok(answer)) => Ok(answer),
        Ok(Err(e)) => {
            error!("Ask failed: {}", e);
            Err(error_reply(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE))
        }
        Err(_) => {
            error!("Ask timed out after {:?}", timeout);
            Err(error_reply(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE))
        }
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<Value> {
    let catalog = state.advisor.catalog();
    Json(json!({
        "status": "healthy",
        "catalog_products": catalog.len(),
        "catalog_fingerprint": catalog.fingerprint(),
        "model": state.model,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Stateless Endpoints
/// =============================

async fn ask_question(State(state): State<ApiState>, Form(form): Form<AskForm>) -> JsonReply {
    if form.question.trim().is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "Question must not be empty.");
    }

    info!("Received question ({} chars)", form.question.len());

    match guarded_ask(state.ask_timeout, state.advisor.ask(&form.question)).await {
        Ok(answer) => (StatusCode::OK, Json(json!({ "response": answer }))),
        Err(reply) => reply,
    }
}

async fn list_products(
    State(state): State<ApiState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let filter = query.into_filter();
    let products = state.advisor.catalog().filter(&filter);

    info!(
        risk_level = ?filter.risk_level,
        max_investment = ?filter.max_investment,
        matched = products.len(),
        "Listing products"
    );

    Json(products)
}

/// =============================
/// Session Chat Endpoints
/// =============================

async fn chat_handler(State(state): State<ApiState>, Json(req): Json<ChatRequest>) -> JsonReply {
    if req.message.trim().is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "Message must not be empty.");
    }

    let chat_id = resolve_session_id(req.chat_id.as_deref());
    let session = state.sessions.get_or_create(chat_id).await;
    let mut session = session.lock().await;

    info!(%chat_id, prior_turns = session.len(), "Received chat message");

    match guarded_ask(
        state.ask_timeout,
        state.advisor.ask_in_session(&mut session, &req.message),
    )
    .await
    {
        Ok(answer) => {
            let reply = ChatReply {
                chat_id: chat_id.to_string(),
                response: answer,
                turns: session.len(),
            };
            (StatusCode::OK, Json(json!(reply)))
        }
        Err(reply) => reply,
    }
}

async fn chat_transcript(
    State(state): State<ApiState>,
    UrlPath(chat_id): UrlPath<String>,
) -> JsonReply {
    let id = resolve_session_id(Some(&chat_id));

    let Some(session) = state.sessions.get(id).await else {
        return error_reply(StatusCode::NOT_FOUND, "Chat not found.");
    };

    let session = session.lock().await;
    let reply = TranscriptReply {
        chat_id: id.to_string(),
        turns: session.turns().to_vec(),
    };
    (StatusCode::OK, Json(json!(reply)))
}

async fn reset_chat(State(state): State<ApiState>, UrlPath(chat_id): UrlPath<String>) -> StatusCode {
    let id = resolve_session_id(Some(&chat_id));
    if state.sessions.reset(id).await {
        info!(chat_id = %id, "Chat session reset");
    }
    StatusCode::NO_CONTENT
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask_question))
        .route("/products", get(list_products))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/:chat_id", get(chat_transcript).delete(reset_chat));

    if let Some(dir) = static_dir {
        info!("Serving static files from {}", dir.display());
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    static_dir: Option<&Path>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
