//! Represents the `/status` endpoint handler and response structure.
//! Provides application status and queue metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::{ApiError, ApiState};

/// Represents the response from the `/status` endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct StatusResponse {
    /// The version of the application.
    pub version: String,
    /// The uptime of the application in seconds.
    pub uptime_secs: u64,
    /// Vehicles in the queue at the last poll, `None` if it failed.
    pub queue_count: Option<usize>,
    /// When the last poll was applied.
    pub last_update: Option<NaiveDateTime>,
    /// Number of registered watches.
    pub watch_count: usize,
    /// Departures counted in the current hour so far.
    pub current_hour_departures: Option<u64>,
}

/// Retrieves application status and metrics.
pub async fn status(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let queue = state.tracker.query_current_count().await;
    let response = StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        queue_count: queue.count,
        last_update: queue.updated_at,
        watch_count: state.tracker.watch_count().await,
        current_hour_departures: state.tracker.open_hour().await.map(|(_, count)| count),
    };
    Ok((StatusCode::OK, Json(response)))
}
