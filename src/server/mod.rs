//! HTTP exposition endpoint
//!
//! One route, `GET /metrics`, serving the current gauge snapshot. The
//! endpoint always answers 200 with best-effort data; probe failures show up
//! as zeroed gauge values, never as HTTP errors.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::routing::get;
use axum::Router;
use log::error;
use tokio::net::TcpListener;

use crate::metrics::MetricsState;

/// Builds the exporter's router around a shared metrics handle.
pub fn router(metrics: Arc<MetricsState>) -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .with_state(metrics)
}

/// Serves the router on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, metrics: Arc<MetricsState>) -> std::io::Result<()> {
    axum::serve(listener, router(metrics)).await
}

async fn serve_metrics(
    State(metrics): State<Arc<MetricsState>>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    let body = metrics.render().unwrap_or_else(|err| {
        // Still 200: a scrape must never fail outright, an empty body just
        // means no samples this round.
        error!("failed to encode metrics snapshot: {err}");
        String::new()
    });

    (
        [(header::CONTENT_TYPE, metrics.exposition_content_type())],
        body,
    )
}
