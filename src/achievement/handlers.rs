use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use super::models::Achievement;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing all unlocked achievements
///
/// GET /achievements
#[instrument(name = "list_achievements", skip(state))]
pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    let achievements = state.achievements.list().await?;
    Ok(Json(achievements))
}

/// HTTP handler for listing one player's achievements
///
/// GET /players/:player_id/achievements
#[instrument(name = "player_achievements", skip(state))]
pub async fn player_achievements(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    let achievements = state.achievements.for_player(&player_id).await?;
    Ok(Json(achievements))
}
