//! axum route handlers.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::debug;

use selgrid_metrics::CONTENT_TYPE;

use crate::ApiState;

/// `<metrics path>`, any method: scrape the hub and return the exposition.
pub async fn metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = state.exporter.collect().await;
    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

/// Fallback: permanent redirect to the metrics path.
pub async fn redirect_to_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    debug!(to = %state.metrics_path, "redirecting to metrics path");
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.metrics_path.to_string())],
    )
}
