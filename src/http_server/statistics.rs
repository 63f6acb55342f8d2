//! Handler for the hourly statistics report.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use super::{ApiError, ApiState};
use crate::models::{StatisticsReport, parse_record_date};

/// Query parameters of `GET /statistics`, both `DD.MM.YYYY`.
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// First date, inclusive.
    pub from: String,
    /// Last date, inclusive.
    pub to: String,
}

/// Returns the finalized records between two dates grouped by date.
pub async fn statistics(
    State(state): State<ApiState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let from = parse_record_date(&query.from)?;
    let to = parse_record_date(&query.to)?;

    let records = state.statistics.records_between(from, to).await?;
    Ok((StatusCode::OK, Json(StatisticsReport::from_records(&records))))
}
