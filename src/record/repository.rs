use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::GameRecord;
use crate::shared::AppError;
use crate::storage::{keys, KeyValueStore};

/// Trait for game-record repository operations
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All records, newest first
    async fn list(&self) -> Result<Vec<GameRecord>, AppError>;
    async fn get(&self, record_id: &str) -> Result<Option<GameRecord>, AppError>;

    /// Inserts keeping the collection sorted by date descending
    async fn insert(&self, record: GameRecord) -> Result<(), AppError>;

    /// Replaces the record with the same id; false if absent
    async fn replace(&self, record_id: &str, record: GameRecord) -> Result<bool, AppError>;

    /// Removes by id; false if absent
    async fn delete(&self, record_id: &str) -> Result<bool, AppError>;
}

/// Store-backed implementation, loaded whole at construction and
/// written through on every mutation.
pub struct StoreRecordRepository {
    store: Arc<dyn KeyValueStore>,
    records: RwLock<Vec<GameRecord>>,
}

impl StoreRecordRepository {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let records = match store.load(keys::GAME_RECORDS).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Record collection failed to decode, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!(count = records.len(), "Loaded game record collection");

        Ok(Self {
            store,
            records: RwLock::new(records),
        })
    }

    async fn persist(&self, records: &[GameRecord]) -> Result<(), AppError> {
        let value = serde_json::to_value(records)
            .map_err(|e| AppError::Storage(format!("encoding game records: {}", e)))?;
        self.store.save(keys::GAME_RECORDS, value).await
    }
}

#[async_trait]
impl RecordRepository for StoreRecordRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<GameRecord>, AppError> {
        Ok(self.records.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn get(&self, record_id: &str) -> Result<Option<GameRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == record_id).cloned())
    }

    #[instrument(skip(self, record))]
    async fn insert(&self, record: GameRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        debug!(record_id = %record.id, date = %record.date, "Inserting game record");
        records.push(record);
        records.sort_by(|a, b| b.date.cmp(&a.date));
        self.persist(&records).await
    }

    #[instrument(skip(self, record))]
    async fn replace(&self, record_id: &str, record: GameRecord) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|r| r.id == record_id) else {
            return Ok(false);
        };
        *slot = record;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        self.persist(&records).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete(&self, record_id: &str) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{settle, RoundScore, RuleConfig};
    use crate::storage::InMemoryStore;
    use chrono::Duration;

    fn sample_record() -> GameRecord {
        let scores: Vec<RoundScore> = (0..4)
            .map(|i| RoundScore {
                player_id: format!("p{}", i),
                name: format!("Player {}", i),
                raw_score: 25000,
            })
            .collect();
        GameRecord::new(settle(&scores, &RuleConfig::default()), RuleConfig::default())
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let repo = StoreRecordRepository::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap();

        let mut older = sample_record();
        older.date = older.date - Duration::days(2);
        let newer = sample_record();

        repo.insert(older.clone()).await.unwrap();
        repo.insert(newer.clone()).await.unwrap();

        let records = repo.list().await.unwrap();
        assert_eq!(records[0].id, newer.id);
        assert_eq!(records[1].id, older.id);
    }

    #[tokio::test]
    async fn replace_and_delete_report_missing_ids() {
        let repo = StoreRecordRepository::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap();
        let record = sample_record();

        assert!(!repo.replace("missing", record.clone()).await.unwrap());
        assert!(!repo.delete("missing").await.unwrap());

        repo.insert(record.clone()).await.unwrap();
        assert!(repo.delete(&record.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_a_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        let repo = StoreRecordRepository::load(Arc::clone(&store)).await.unwrap();
        let record = sample_record();
        repo.insert(record.clone()).await.unwrap();

        let reloaded = StoreRecordRepository::load(store).await.unwrap();
        assert_eq!(reloaded.get(&record.id).await.unwrap(), Some(record));
    }
}
