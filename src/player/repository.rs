use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::Player;
use crate::shared::AppError;
use crate::storage::{keys, KeyValueStore};

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Player>, AppError>;
    async fn get(&self, player_id: &str) -> Result<Option<Player>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Player>, AppError>;

    /// Returns the player with the given (trimmed) name, creating one
    /// if it does not exist yet. Rejects empty names. Atomic, so two
    /// concurrent calls for the same name yield the same player.
    async fn get_or_create(&self, name: &str) -> Result<Player, AppError>;
}

/// Store-backed implementation: the collection is loaded whole at
/// construction and written through on every mutation.
pub struct StorePlayerRepository {
    store: Arc<dyn KeyValueStore>,
    players: RwLock<Vec<Player>>,
}

impl StorePlayerRepository {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let players = match store.load(keys::PLAYERS).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Player collection failed to decode, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!(count = players.len(), "Loaded player collection");

        Ok(Self {
            store,
            players: RwLock::new(players),
        })
    }

    async fn persist(&self, players: &[Player]) -> Result<(), AppError> {
        let value = serde_json::to_value(players)
            .map_err(|e| AppError::Storage(format!("encoding players: {}", e)))?;
        self.store.save(keys::PLAYERS, value).await
    }
}

#[async_trait]
impl PlayerRepository for StorePlayerRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Player>, AppError> {
        Ok(self.players.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn get(&self, player_id: &str) -> Result<Option<Player>, AppError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|p| p.id == player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Player>, AppError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|p| p.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn get_or_create(&self, name: &str) -> Result<Player, AppError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Player name must not be empty".to_string()));
        }

        let mut players = self.players.write().await;
        if let Some(existing) = players.iter().find(|p| p.name == trimmed) {
            return Ok(existing.clone());
        }

        let player = Player::new(trimmed);
        players.push(player.clone());
        self.persist(&players).await?;

        debug!(player_id = %player.id, name = %player.name, "Player created");
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    async fn repo() -> StorePlayerRepository {
        StorePlayerRepository::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn get_or_create_reuses_existing_name() {
        let repo = repo().await;
        let first = repo.get_or_create("Akira").await.unwrap();
        let second = repo.get_or_create("  Akira  ").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let repo = repo().await;
        let result = repo.get_or_create("   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn players_survive_a_reload_from_the_same_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        let repo = StorePlayerRepository::load(Arc::clone(&store)).await.unwrap();
        let created = repo.get_or_create("Kana").await.unwrap();

        let reloaded = StorePlayerRepository::load(store).await.unwrap();
        let found = reloaded.get(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }
}
