//! selgrid-api — HTTP surface of the Selenium Grid exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | any | `<metrics path>` | Scrape the hub, Prometheus exposition |
//! | any | anything else | `301 Moved Permanently` to the metrics path |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use selgrid_metrics::Exporter;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub exporter: Arc<Exporter>,
    pub metrics_path: Arc<str>,
}

/// Build the exporter router.
///
/// `metrics_path` must be a literal absolute path, as accepted by
/// `selgrid_core::config::validate_metrics_path`.
pub fn build_router(exporter: Arc<Exporter>, metrics_path: &str) -> Router {
    let state = ApiState {
        exporter,
        metrics_path: Arc::from(metrics_path),
    };

    Router::new()
        .route(metrics_path, any(handlers::metrics))
        .fallback(handlers::redirect_to_metrics)
        .with_state(state)
}
