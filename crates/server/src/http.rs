//! HTTP Endpoints
//!
//! REST API for the triage dialog.

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use triage_core::ConversationState;

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

const FALLBACK_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let request_timeout = Duration::from_secs(config.server.request_timeout_seconds);
    drop(config); // Release lock before building router

    Router::new()
        .route("/api/chat", post(chat))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin endpoints
        .route("/admin/reload-config", post(reload_config))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        } else {
            tracing::info!("No CORS origins configured, defaulting to {}", FALLBACK_ORIGIN);
        }
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static(FALLBACK_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Kept as raw JSON so a bad state restarts the conversation instead of
    /// failing the request
    #[serde(default)]
    pub dialog_state: Option<serde_json::Value>,
}

/// Chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: Option<String>,
    pub dialog_state: ConversationState,
}

/// Decode the caller's state; anything unusable means "new conversation"
fn decode_dialog_state(raw: Option<serde_json::Value>) -> Option<ConversationState> {
    match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "Undecodable dialog state, starting new conversation");
                None
            },
        },
    }
}

/// POST /api/chat
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    if request.message.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    let prior = ConversationState::resume(
        decode_dialog_state(request.dialog_state),
        state.default_threshold(),
    );

    let outcome = state
        .engine
        .handle_turn(&prior, &request.message)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Chat turn failed");
            ServerError::from(e)
        })?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        intent: outcome.intent,
        dialog_state: outcome.state,
    }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let config = state.get_config();
    let body = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": config.environment,
        "confidence_threshold": config.dialog.confidence_threshold,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    drop(config);

    (StatusCode::OK, Json(body))
}

/// POST /admin/reload-config
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        ),
        Err(e) => {
            tracing::error!("Config reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": e.to_string()
                })),
            )
        },
    }
}
