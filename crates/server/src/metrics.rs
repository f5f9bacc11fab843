//! Prometheus metrics

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;
use crate::ServerError;

const PREDICTION_LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Install the global Prometheus recorder
///
/// Must be called at most once per process.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("triage_prediction_latency_seconds".to_string()),
            PREDICTION_LATENCY_BUCKETS,
        )
        .map_err(|e| ServerError::Internal(format!("Invalid metric buckets: {}", e)))?
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    metrics::describe_counter!("triage_turns_total", "Dialog turns by outcome");
    metrics::describe_counter!("triage_decisions_total", "Confidence policy decisions");
    metrics::describe_histogram!(
        "triage_prediction_latency_seconds",
        metrics::Unit::Seconds,
        "Disease prediction latency"
    );

    Ok(handle)
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
