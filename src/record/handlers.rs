use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::models::GameRecord;
use super::service::RecordService;
use super::types::SaveRoundRequest;
use crate::export;
use crate::scoring::{Payment, DEFAULT_YEN_PER_POINT};
use crate::shared::{AppError, AppState};

/// HTTP handler for settling and saving a standalone round
///
/// POST /records
#[instrument(name = "save_round", skip(state, request))]
pub async fn save_round(
    State(state): State<AppState>,
    Json(request): Json<SaveRoundRequest>,
) -> Result<Json<GameRecord>, AppError> {
    let service = RecordService::from_state(&state);
    let record = service.save_round(request).await?;
    Ok(Json(record))
}

/// HTTP handler for listing all game records, newest first
///
/// GET /records
#[instrument(name = "list_records", skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameRecord>>, AppError> {
    let records = state.records.list().await?;
    Ok(Json(records))
}

/// HTTP handler for fetching one record
///
/// GET /records/:id
#[instrument(name = "get_record", skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<GameRecord>, AppError> {
    let record = state
        .records
        .get(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {}", record_id)))?;
    Ok(Json(record))
}

/// HTTP handler for replacing a record after a user edit
///
/// PUT /records/:id
#[instrument(name = "update_record", skip(state, record))]
pub async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(record): Json<GameRecord>,
) -> Result<Json<GameRecord>, AppError> {
    let service = RecordService::from_state(&state);
    let record = service.update_record(&record_id, record).await?;
    Ok(Json(record))
}

/// HTTP handler for deleting a record
///
/// DELETE /records/:id
#[instrument(name = "delete_record", skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<(), AppError> {
    let service = RecordService::from_state(&state);
    service.delete_record(&record_id).await
}

#[derive(Debug, Deserialize)]
pub struct SettlementQuery {
    /// Conversion rate from points to yen, defaults to 100
    pub yen_per_point: Option<f64>,
}

/// HTTP handler computing pairwise payments for a record's scores and
/// shared expenses
///
/// GET /records/:id/settlements
#[instrument(name = "record_settlements", skip(state))]
pub async fn record_settlements(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Query(query): Query<SettlementQuery>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let service = RecordService::from_state(&state);
    let payments = service
        .settlements(&record_id, query.yen_per_point.unwrap_or(DEFAULT_YEN_PER_POINT))
        .await?;
    Ok(Json(payments))
}

/// HTTP handler rendering a record as shareable plain text
///
/// GET /records/:id/share-text
#[instrument(name = "record_share_text", skip(state))]
pub async fn record_share_text(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<String, AppError> {
    let record = state
        .records
        .get(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {}", record_id)))?;
    Ok(export::format_record_detail(&record))
}
