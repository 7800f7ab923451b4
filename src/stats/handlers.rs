use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use super::models::{HeadToHeadRecord, PlayerStats};
use super::service::StatsService;
use crate::shared::{AppError, AppState};

/// HTTP handler for one player's aggregate statistics
///
/// GET /players/:player_id/stats
/// 404 when the player is unknown or has no recorded games yet.
#[instrument(name = "player_stats", skip(state))]
pub async fn player_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerStats>, AppError> {
    let service = StatsService::from_state(&state);
    let stats = service
        .player_stats(&player_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No games recorded for player {}", player_id)))?;
    Ok(Json(stats))
}

/// HTTP handler for one player's head-to-head comparison table
///
/// GET /players/:player_id/head-to-head
#[instrument(name = "head_to_head", skip(state))]
pub async fn head_to_head(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<HeadToHeadRecord>>, AppError> {
    let service = StatsService::from_state(&state);
    let records = service.head_to_head(&player_id).await?;
    Ok(Json(records))
}
