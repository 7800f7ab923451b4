use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::Achievement;
use crate::shared::AppError;
use crate::storage::{keys, KeyValueStore};

/// Trait for achievement repository operations
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Achievement>, AppError>;
    async fn for_player(&self, player_id: &str) -> Result<Vec<Achievement>, AppError>;
    async fn add(&self, achievement: Achievement) -> Result<(), AppError>;
}

/// Store-backed implementation, loaded whole at construction and
/// written through on every unlock.
pub struct StoreAchievementRepository {
    store: Arc<dyn KeyValueStore>,
    achievements: RwLock<Vec<Achievement>>,
}

impl StoreAchievementRepository {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let achievements = match store.load(keys::ACHIEVEMENTS).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Achievement collection failed to decode, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!(count = achievements.len(), "Loaded achievement collection");

        Ok(Self {
            store,
            achievements: RwLock::new(achievements),
        })
    }

    async fn persist(&self, achievements: &[Achievement]) -> Result<(), AppError> {
        let value = serde_json::to_value(achievements)
            .map_err(|e| AppError::Storage(format!("encoding achievements: {}", e)))?;
        self.store.save(keys::ACHIEVEMENTS, value).await
    }
}

#[async_trait]
impl AchievementRepository for StoreAchievementRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Achievement>, AppError> {
        Ok(self.achievements.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn for_player(&self, player_id: &str) -> Result<Vec<Achievement>, AppError> {
        let achievements = self.achievements.read().await;
        Ok(achievements
            .iter()
            .filter(|a| a.player_id == player_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, achievement))]
    async fn add(&self, achievement: Achievement) -> Result<(), AppError> {
        let mut achievements = self.achievements.write().await;
        debug!(
            player_id = %achievement.player_id,
            title = %achievement.title,
            "Achievement unlocked"
        );
        achievements.push(achievement);
        self.persist(&achievements).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use chrono::Utc;

    #[tokio::test]
    async fn unlocks_survive_a_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        let repo = StoreAchievementRepository::load(Arc::clone(&store))
            .await
            .unwrap();
        repo.add(Achievement::first_top("p1", Utc::now())).await.unwrap();
        repo.add(Achievement::yakuman("p2", "Four concealed pungs", Utc::now()))
            .await
            .unwrap();

        let reloaded = StoreAchievementRepository::load(store).await.unwrap();
        assert_eq!(reloaded.list().await.unwrap().len(), 2);
        assert_eq!(reloaded.for_player("p1").await.unwrap().len(), 1);
    }
}
