// Library crate for the mahjong score-log service
// This file exposes the public API for integration tests

pub mod achievement;
pub mod export;
pub mod notification;
pub mod player;
pub mod record;
pub mod scoring;
pub mod session;
pub mod shared;
pub mod stats;
pub mod storage;

// Re-export commonly used types for easier access in tests
pub use notification::{Notification, NotificationBus, Severity};
pub use scoring::{resolve_ranks, settle, settle_debts, RoundScore, RuleConfig, UmaPreset};
pub use shared::{AppError, AppState};
pub use storage::{InMemoryStore, JsonFileStore, KeyValueStore};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the full application router over the given state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/players",
            post(player::create_player).get(player::list_players),
        )
        .route("/players/:player_id/stats", get(stats::player_stats))
        .route("/players/:player_id/head-to-head", get(stats::head_to_head))
        .route(
            "/players/:player_id/achievements",
            get(achievement::player_achievements),
        )
        .route(
            "/records",
            post(record::save_round).get(record::list_records),
        )
        .route(
            "/records/:id",
            get(record::get_record)
                .put(record::update_record)
                .delete(record::delete_record),
        )
        .route("/records/:id/settlements", get(record::record_settlements))
        .route("/records/:id/share-text", get(record::record_share_text))
        .route(
            "/sessions",
            post(session::start_session).get(session::list_sessions),
        )
        .route("/sessions/active", get(session::active_session))
        .route("/sessions/active/rounds", post(session::record_round))
        .route("/sessions/active/summary", get(session::session_summary))
        .route(
            "/sessions/active/share-text",
            get(session::summary_share_text),
        )
        .route("/sessions/active/complete", post(session::complete_session))
        .route("/sessions/:id", axum::routing::delete(session::delete_session))
        .route("/achievements", get(achievement::list_achievements))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
