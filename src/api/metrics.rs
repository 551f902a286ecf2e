//! Prometheus /metrics endpoint

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// GET /metrics, Prometheus text exposition format
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "System",
    responses(
        (status = 200, description = "Prometheus metrics"),
        (status = 404, description = "Metrics disabled")
    )
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.prometheus_handle.as_ref() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "Metrics not enabled".to_string()),
    }
}
