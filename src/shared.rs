use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::achievement::repository::AchievementRepository;
use crate::notification::NotificationBus;
use crate::player::repository::PlayerRepository;
use crate::record::repository::RecordRepository;
use crate::session::repository::SessionRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub players: Arc<dyn PlayerRepository>,
    pub records: Arc<dyn RecordRepository>,
    pub achievements: Arc<dyn AchievementRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub notifications: NotificationBus,
}

impl AppState {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        records: Arc<dyn RecordRepository>,
        achievements: Arc<dyn AchievementRepository>,
        sessions: Arc<dyn SessionRepository>,
        notifications: NotificationBus,
    ) -> Self {
        Self {
            players,
            records,
            achievements,
            sessions,
            notifications,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("A session is already active")]
    SessionAlreadyActive,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::NoActiveSession => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::SessionAlreadyActive => (StatusCode::CONFLICT, self.to_string()),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
