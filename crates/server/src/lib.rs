//! Symptom Triage Server
//!
//! Exposes the dialog over HTTP. The caller round-trips the dialog state on
//! every request; the server keeps no per-conversation data.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::{create_router, ChatRequest, ChatResponse};
pub use metrics::init_metrics;
pub use state::{build_engine, AppState};

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dialog unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<triage_config::ConfigError> for ServerError {
    fn from(err: triage_config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<triage_agent::AgentError> for ServerError {
    fn from(err: triage_agent::AgentError) -> Self {
        ServerError::Unavailable(err.to_string())
    }
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Config(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Unavailable(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let body = axum::Json(serde_json::json!({ "error": self.to_string() }));
        let status: axum::http::StatusCode = self.into();
        (status, body).into_response()
    }
}
