//! Handler for the aggregate queue size.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::ApiState;

/// Returns the last known queue size; `count` is `null` while the checkpoint
/// is unreachable.
pub async fn current_count(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.tracker.query_current_count().await))
}
