//! HTTP server module
//!
//! Exposes the command interface (watch management, queue size) and the
//! statistics report over a small JSON API. Mutating endpoints require a
//! bearer token matching `server.api_key`.

use std::{net::SocketAddr, sync::Arc, time::Instant};

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig, engine::{clock::Clock, tracker::QueueTracker},
    persistence::StatisticsSink,
};

mod auth;
mod error;
mod queue;
mod statistics;
mod status;
mod watches;

pub use error::ApiError;
pub use status::StatusResponse;
pub use watches::AddWatchRequest;

/// Shared state of the HTTP handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Shared application configuration.
    pub config: Arc<AppConfig>,
    /// Shared queue state.
    pub tracker: Arc<QueueTracker>,
    /// Source of the statistics report.
    pub statistics: Arc<dyn StatisticsSink>,
    /// Timestamps new watches.
    pub clock: Arc<dyn Clock>,
    /// When the process started, for uptime.
    pub started_at: Instant,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Builds the API router.
pub fn router(state: ApiState) -> Router {
    let protected = middleware::from_fn_with_state(state.clone(), auth::auth);

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status::status))
        .route("/queue/count", get(queue::current_count))
        .route("/statistics", get(statistics::statistics))
        .route("/watches", post(watches::add_watch).route_layer(protected.clone()))
        .route(
            "/watches/{identifier}",
            get(watches::get_watch).merge(delete(watches::remove_watch).route_layer(protected)),
        )
        .with_state(state)
}

/// Serves the API on `server.listen_address` until `cancellation_token` is
/// cancelled.
pub async fn run_server(
    state: ApiState,
    cancellation_token: CancellationToken,
) -> Result<(), std::io::Error> {
    let addr: SocketAddr = state.config.server.listen_address.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid server.listen_address '{}': {e}", state.config.server.listen_address),
        )
    })?;

    if state.config.server.api_key.is_none() {
        tracing::warn!("No API key configured; watch management endpoints will reject all requests.");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "HTTP server listening.");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await?;

    tracing::info!("HTTP server has shut down.");
    Ok(())
}
