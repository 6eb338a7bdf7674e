//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        DefaultBodyLimit, Json, Query, State,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::error::ApiError;
use super::middleware::detect_scanners;
use super::state::AppState;
use crate::dashboard::{DashboardSummary, Playbook, PLAYBOOK};
use crate::error::ShieldError;
use crate::events::{NewSecurityEvent, DEFAULT_QUERY_LIMIT, OVERVIEW_EVENT_LIMIT};

const FETCH_ERROR: &str = "Failed to fetch security data";
const LOG_ERROR: &str = "Failed to log security event";
const INVALID_MESSAGE: &str = "Invalid message format";

/// Events summarized by `/api/security/summary` when no limit is given.
pub const SUMMARY_EVENT_LIMIT: usize = 50;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health and status
        .route("/health", get(health_check))
        .route("/status", get(status))
        // Reporting API
        .route("/api/security", get(read_security).post(write_security))
        .route("/api/security/summary", get(security_summary))
        .route("/api/security/playbook", get(playbook))
        // Chat
        .route("/api/chat", post(chat))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(middleware::from_fn_with_state(state.clone(), detect_scanners));

    if state.config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Status response
#[derive(Serialize)]
pub struct StatusResponse {
    /// Always `ok`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Seconds since start
    pub uptime_secs: u64,
    /// Events currently stored
    pub events: usize,
    /// Store capacity
    pub capacity: usize,
    /// Whether the detector is running
    pub detection: bool,
    /// `upstream` or `fallback`
    pub chat_backend: &'static str,
}

/// Status endpoint
async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let events = state
        .store
        .len()
        .map_err(|e| ApiError::from_shield(&e, FETCH_ERROR))?;

    Ok(Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime().as_secs(),
        events,
        capacity: state.store.capacity(),
        detection: state.classifier.enabled,
        chat_backend: state.chat.backend_name(),
    }))
}

/// Query parameters of `GET /api/security`
#[derive(Debug, Default, Deserialize)]
pub struct SecurityQuery {
    /// `events`, `metrics`, or absent for both
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Maximum events returned
    pub limit: Option<String>,
}

fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid limit: {value}"))),
    }
}

/// Read events, metrics, or both
async fn read_security(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SecurityQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let store = &state.store;
    let fetch_error = |e: ShieldError| ApiError::from_shield(&e, FETCH_ERROR);

    match query.kind.as_deref() {
        Some("metrics") => {
            let metrics = store.metrics().map_err(fetch_error)?;
            Ok(Json(metrics).into_response())
        },
        Some("events") => {
            let limit = parse_limit(query.limit.as_deref(), DEFAULT_QUERY_LIMIT)?;
            let events = store.query(limit).map_err(fetch_error)?;
            Ok(Json(events).into_response())
        },
        _ => {
            let snapshot = store.snapshot(OVERVIEW_EVENT_LIMIT).map_err(fetch_error)?;
            Ok(Json(snapshot).into_response())
        },
    }
}

/// Record an event, or clear the store with `{ "clear": true }`
async fn write_security(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body?;
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;

    if value.get("clear").and_then(Value::as_bool) == Some(true) {
        state
            .store
            .clear()
            .map_err(|e| ApiError::from_shield(&e, LOG_ERROR))?;
        return Ok(Json(json!({ "ok": true })).into_response());
    }

    let event: NewSecurityEvent = serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid event payload: {e}")))?;
    let stored = state
        .store
        .append(event)
        .map_err(|e| ApiError::from_shield(&e, LOG_ERROR))?;

    Ok(Json(stored).into_response())
}

/// Query parameters of `GET /api/security/summary`
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Events in the summarized window
    pub limit: Option<String>,
}

/// Server-computed dashboard summary
async fn security_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let Query(query) = query?;
    let limit = parse_limit(query.limit.as_deref(), SUMMARY_EVENT_LIMIT)?;
    let snapshot = state
        .store
        .snapshot(limit)
        .map_err(|e| ApiError::from_shield(&e, FETCH_ERROR))?;

    Ok(Json(DashboardSummary::compute(
        snapshot.recent_events,
        snapshot.metrics,
    )))
}

/// Incident-response reference data
async fn playbook() -> Json<Playbook> {
    Json(PLAYBOOK)
}

/// Chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text
    pub response: String,
}

/// Answer a portfolio question
async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let body = body?;
    let message = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::bad_request(INVALID_MESSAGE))?;

    let reply = state.chat.respond(&message).await;
    tracing::debug!(source = ?reply.source, "chat reply");

    Ok(Json(ChatResponse {
        response: reply.response,
    }))
}
