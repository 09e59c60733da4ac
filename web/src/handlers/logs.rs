//! Gameplay log handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::{FixedOffset, Local, Offset};
use logbook::{
    bucket_by_category, bucket_by_time, CategoryCount, LogEntry, LogFilter, LogStats, TimeBucket,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::metrics;
use crate::types::{CreateLogRequest, LogsQuery, SuccessResponse, TimelineQuery};
use crate::AppState;

/// List stored logs, most recent first, optionally filtered.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let filter = LogFilter::from_params(
        query.log_type.as_deref(),
        query.severity.as_deref(),
        query.search.as_deref(),
    )
    .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let logs = state
        .store
        .list(&filter.store_query())
        .await
        .map_err(|e| ApiError::from_log("fetching logs", e))?;
    Ok(Json(filter.apply(logs)))
}

/// Store one log record submitted by a client.
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let entry = request.into_entry()?;

    match state.store.insert(&entry).await {
        Ok(()) => {
            metrics::LOGS_WRITTEN.inc();
            debug!(id = %entry.id, "Log created");
            Ok(Json(SuccessResponse::created(entry.id)))
        }
        Err(e) => {
            metrics::LOG_WRITE_FAILURES.inc();
            Err(ApiError::from_log("creating log", e))
        }
    }
}

/// Delete every stored log.
pub async fn clear_logs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .store
        .clear_all()
        .await
        .map_err(|e| ApiError::from_log("clearing logs", e))?;
    Ok(Json(SuccessResponse::ok()))
}

/// Totals by type and severity.
pub async fn log_stats(State(state): State<Arc<AppState>>) -> Result<Json<LogStats>, ApiError> {
    let stats = state
        .store
        .compute_stats()
        .await
        .map_err(|e| ApiError::from_log("computing log stats", e))?;
    Ok(Json(stats))
}

/// Ten-minute activity buckets over the last 24 hours of logs.
pub async fn log_timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<TimeBucket>>, ApiError> {
    let tz = match query.utc_offset_minutes {
        Some(minutes) => minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ApiError::bad_request("Invalid utcOffsetMinutes"))?,
        None => Local::now().offset().fix(),
    };

    let logs = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::from_log("fetching logs", e))?;
    Ok(Json(bucket_by_time(&logs, &tz)))
}

/// Top error categories.
pub async fn log_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let logs = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::from_log("fetching logs", e))?;
    Ok(Json(bucket_by_category(&logs)))
}
