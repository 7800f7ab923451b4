use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, instrument};

use super::models::Player;
use crate::shared::{AppError, AppState};

/// Request payload for registering a player
#[derive(Debug, Deserialize)]
pub struct PlayerCreateRequest {
    pub name: String,
}

/// HTTP handler for registering a player by name
///
/// POST /players
/// Returns the existing player when the name is already taken.
#[instrument(name = "create_player", skip(state))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerCreateRequest>,
) -> Result<Json<Player>, AppError> {
    let player = state.players.get_or_create(&request.name).await?;
    info!(player_id = %player.id, name = %player.name, "Player registered");
    Ok(Json(player))
}

/// HTTP handler for listing all players
///
/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, AppError> {
    let players = state.players.list().await?;
    Ok(Json(players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/players",
                axum::routing::post(create_player).get(list_players),
            )
            .with_state(state)
    }

    #[tokio::test]
    async fn create_player_handler_returns_player() {
        let app = app(test_state().await);

        let request = Request::builder()
            .method("POST")
            .uri("/players")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "Akira"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let player: Player = serde_json::from_slice(&body).unwrap();
        assert_eq!(player.name, "Akira");
        assert!(!player.id.is_empty());
    }

    #[tokio::test]
    async fn empty_name_yields_bad_request() {
        let app = app(test_state().await);

        let request = Request::builder()
            .method("POST")
            .uri("/players")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "  "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
