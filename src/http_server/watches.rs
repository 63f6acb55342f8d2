//! Handlers for watch-related endpoints in the HTTP server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, ApiState};
use crate::models::{Identifier, SubscriberRef};

/// Request body of `POST /watches`.
#[derive(Debug, Deserialize)]
pub struct AddWatchRequest {
    /// Registration number to watch.
    pub identifier: String,
    /// Report positions at or below this value.
    pub threshold: u32,
    /// Who receives the notifications (Telegram chat id).
    pub subscriber: String,
}

/// Registers or replaces a watch.
pub async fn add_watch(
    State(state): State<ApiState>,
    Json(payload): Json<AddWatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identifier = Identifier::parse(&payload.identifier)?;
    let subscriber = payload.subscriber.trim();
    if subscriber.is_empty() {
        return Err(ApiError::UnprocessableEntity("Subscriber must not be empty".to_string()));
    }

    let added = state
        .tracker
        .add_watch(identifier.clone(), payload.threshold, SubscriberRef::new(subscriber), state.clock.now())
        .await?;
    let replaced = added.replaced.is_some();

    tracing::info!(identifier = %identifier, threshold = payload.threshold, replaced, "Watch registered.");
    Ok((StatusCode::CREATED, Json(json!({ "watch": added.watch, "replaced": replaced }))))
}

/// Retrieves the watch for one registration number.
pub async fn get_watch(
    State(state): State<ApiState>,
    Path(raw_identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let identifier = Identifier::parse(&raw_identifier)?;
    let watch = state
        .tracker
        .watch(&identifier)
        .await
        .ok_or_else(|| ApiError::NotFound("Watch not found".to_string()))?;

    Ok((StatusCode::OK, Json(json!({ "watch": watch }))))
}

/// Removes a watch. Removing an unknown watch is not an error.
pub async fn remove_watch(
    State(state): State<ApiState>,
    Path(raw_identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let identifier = Identifier::parse(&raw_identifier)?;
    let removed = state.tracker.remove_watch(&identifier).await;

    tracing::info!(identifier = %identifier, removed, "Watch removal requested.");
    Ok((StatusCode::OK, Json(json!({ "identifier": identifier, "removed": removed }))))
}
