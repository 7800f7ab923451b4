use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::instrument;

use super::models::{GameSession, SessionStanding};
use super::service::SessionService;
use super::types::{RecordRoundRequest, StartSessionRequest};
use crate::export;
use crate::record::models::GameRecord;
use crate::shared::{AppError, AppState};

/// HTTP handler for starting a new session
///
/// POST /sessions
/// Fails with 409 while another session is active.
#[instrument(name = "start_session", skip(state, request))]
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<GameSession>, AppError> {
    let service = SessionService::from_state(&state);
    let session = service.start_session(request).await?;
    Ok(Json(session))
}

/// HTTP handler for listing completed sessions, newest first
///
/// GET /sessions
#[instrument(name = "list_sessions", skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameSession>>, AppError> {
    let sessions = state.sessions.list().await?;
    Ok(Json(sessions))
}

/// HTTP handler for fetching the active session
///
/// GET /sessions/active
#[instrument(name = "active_session", skip(state))]
pub async fn active_session(
    State(state): State<AppState>,
) -> Result<Json<GameSession>, AppError> {
    let session = state
        .sessions
        .active()
        .await?
        .ok_or(AppError::NoActiveSession)?;
    Ok(Json(session))
}

/// Response for a recorded session round
#[derive(Debug, Serialize)]
pub struct RoundResponse {
    pub session: GameSession,
    pub record: GameRecord,
}

/// HTTP handler for recording one round in the active session
///
/// POST /sessions/active/rounds
#[instrument(name = "record_round", skip(state, request))]
pub async fn record_round(
    State(state): State<AppState>,
    Json(request): Json<RecordRoundRequest>,
) -> Result<Json<RoundResponse>, AppError> {
    let service = SessionService::from_state(&state);
    let (session, record) = service.record_round(request).await?;
    Ok(Json(RoundResponse { session, record }))
}

/// HTTP handler for the active session's running standings. Returns an
/// empty list until the first round is recorded.
///
/// GET /sessions/active/summary
#[instrument(name = "session_summary", skip(state))]
pub async fn session_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionStanding>>, AppError> {
    let service = SessionService::from_state(&state);
    let standings = service.summary().await?.unwrap_or_default();
    Ok(Json(standings))
}

/// HTTP handler rendering the active session's standings as shareable
/// plain text
///
/// GET /sessions/active/share-text
#[instrument(name = "summary_share_text", skip(state))]
pub async fn summary_share_text(State(state): State<AppState>) -> Result<String, AppError> {
    let session = state
        .sessions
        .active()
        .await?
        .ok_or(AppError::NoActiveSession)?;
    let standings = session.summary().unwrap_or_default();
    Ok(export::format_session_summary(
        session.name.as_deref().unwrap_or(""),
        &standings,
        &session.settings,
    ))
}

/// HTTP handler for completing the active session
///
/// POST /sessions/active/complete
#[instrument(name = "complete_session", skip(state))]
pub async fn complete_session(
    State(state): State<AppState>,
) -> Result<Json<GameSession>, AppError> {
    let service = SessionService::from_state(&state);
    let session = service.complete_session().await?;
    Ok(Json(session))
}

/// HTTP handler for deleting a session (active or historical)
///
/// DELETE /sessions/:id
#[instrument(name = "delete_session", skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<(), AppError> {
    let service = SessionService::from_state(&state);
    service.delete_session(&session_id).await
}
