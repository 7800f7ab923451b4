use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::GameRecord;
use super::repository::RecordRepository;
use super::types::{RawScoreEntry, SaveRoundRequest};
use crate::achievement::AchievementService;
use crate::notification::{Notification, NotificationBus, Severity};
use crate::player::repository::PlayerRepository;
use crate::scoring::{build_balances, settle, settle_debts, Payment, RoundScore, RuleConfig};
use crate::session::repository::SessionRepository;
use crate::shared::{AppError, AppState};

/// Number of players at a closed table
pub const TABLE_SIZE: usize = 4;

/// Service for saving, editing and settling game records
pub struct RecordService {
    records: Arc<dyn RecordRepository>,
    players: Arc<dyn PlayerRepository>,
    sessions: Arc<dyn SessionRepository>,
    achievements: AchievementService,
    notifications: NotificationBus,
}

impl RecordService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            records: Arc::clone(&state.records),
            players: Arc::clone(&state.players),
            sessions: Arc::clone(&state.sessions),
            achievements: AchievementService::new(
                Arc::clone(&state.achievements),
                state.notifications.clone(),
            ),
            notifications: state.notifications.clone(),
        }
    }

    /// Checks the closed-table constraint the settlement guarantee
    /// depends on: four named entries whose raw scores sum to
    /// `starting_points * 4`.
    pub fn validate_round(
        scores: &[RawScoreEntry],
        settings: &RuleConfig,
    ) -> Result<(), AppError> {
        if scores.len() != TABLE_SIZE {
            return Err(AppError::Validation(format!(
                "A round needs exactly {} players, got {}",
                TABLE_SIZE,
                scores.len()
            )));
        }
        if scores.iter().any(|s| s.name.trim().is_empty()) {
            return Err(AppError::Validation(
                "Every player needs a non-empty name".to_string(),
            ));
        }

        let total: i32 = scores.iter().map(|s| s.raw_score).sum();
        let expected = settings.starting_points * TABLE_SIZE as i32;
        if total != expected {
            return Err(AppError::Validation(format!(
                "Raw scores sum to {} but must sum to {}",
                total, expected
            )));
        }
        Ok(())
    }

    /// Settles and saves a standalone round (not part of a session)
    #[instrument(skip(self, request))]
    pub async fn save_round(&self, request: SaveRoundRequest) -> Result<GameRecord, AppError> {
        let settings = request.settings.unwrap_or_default();
        Self::validate_round(&request.scores, &settings)?;

        let scores = self.resolve_players(&request.scores).await?;
        let settled = settle(&scores, &settings);

        let mut record = GameRecord::new(settled, settings);
        record.expenses = request.expenses;
        record.highlights = request.highlights;
        record.tags = request.tags;
        record.venue = request.venue;

        self.add_record(record).await
    }

    /// Saves an already-settled record: evaluates achievements against
    /// the history as it was before the save, then inserts and
    /// notifies. Also used by the session workflow.
    #[instrument(skip(self, record))]
    pub async fn add_record(&self, record: GameRecord) -> Result<GameRecord, AppError> {
        let prior_records = self.records.list().await?;
        self.achievements
            .evaluate_record(&record, &prior_records)
            .await?;

        self.records.insert(record.clone()).await?;
        info!(record_id = %record.id, "Game record saved");

        self.notifications.emit(Notification::new(
            "Game record saved",
            format!("Recorded the game of {}", record.date.format("%Y-%m-%d")),
            Severity::Success,
        ));
        Ok(record)
    }

    #[instrument(skip(self, record))]
    pub async fn update_record(
        &self,
        record_id: &str,
        record: GameRecord,
    ) -> Result<GameRecord, AppError> {
        if !self.records.replace(record_id, record.clone()).await? {
            return Err(AppError::NotFound(format!("Record {}", record_id)));
        }
        info!(record_id = %record_id, "Game record updated");

        self.notifications.emit(Notification::new(
            "Game record updated",
            format!("Updated the game of {}", record.date.format("%Y-%m-%d")),
            Severity::Success,
        ));
        Ok(record)
    }

    /// Deletes a record and detaches it from the active session, if
    /// that session was referencing it
    #[instrument(skip(self))]
    pub async fn delete_record(&self, record_id: &str) -> Result<(), AppError> {
        if !self.records.delete(record_id).await? {
            return Err(AppError::NotFound(format!("Record {}", record_id)));
        }

        if self.sessions.detach_record(record_id).await? {
            debug!(record_id = %record_id, "Record detached from active session");
        }

        info!(record_id = %record_id, "Game record deleted");
        self.notifications.emit(Notification::new(
            "Game record deleted",
            String::new(),
            Severity::Warning,
        ));
        Ok(())
    }

    /// Converts a record's settled scores plus its shared expenses into
    /// pairwise payment instructions
    #[instrument(skip(self))]
    pub async fn settlements(
        &self,
        record_id: &str,
        yen_per_point: f64,
    ) -> Result<Vec<Payment>, AppError> {
        let record = self
            .records
            .get(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Record {}", record_id)))?;

        let balances = build_balances(&record.players, &record.expenses, yen_per_point);
        Ok(settle_debts(&balances))
    }

    /// Maps each entry to a registered player, creating unknown players
    /// from their denormalized name and back-filling missing names.
    async fn resolve_players(
        &self,
        entries: &[RawScoreEntry],
    ) -> Result<Vec<RoundScore>, AppError> {
        let mut scores = Vec::with_capacity(entries.len());
        for entry in entries {
            let player = match &entry.player_id {
                Some(id) => match self.players.get(id).await? {
                    Some(player) => player,
                    None => self.players.get_or_create(&entry.name).await?,
                },
                None => self.players.get_or_create(&entry.name).await?,
            };
            scores.push(RoundScore {
                player_id: player.id,
                name: player.name,
                raw_score: entry.raw_score,
            });
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::test_state;

    fn entries(raw_scores: [i32; 4]) -> Vec<RawScoreEntry> {
        raw_scores
            .iter()
            .enumerate()
            .map(|(i, &raw_score)| RawScoreEntry {
                player_id: None,
                name: format!("Player {}", i + 1),
                raw_score,
            })
            .collect()
    }

    fn request(raw_scores: [i32; 4]) -> SaveRoundRequest {
        SaveRoundRequest {
            scores: entries(raw_scores),
            settings: None,
            expenses: Vec::new(),
            highlights: Vec::new(),
            tags: Vec::new(),
            venue: None,
        }
    }

    #[tokio::test]
    async fn save_round_registers_players_and_settles() {
        let state = test_state().await;
        let service = RecordService::from_state(&state);

        let record = service
            .save_round(request([45000, 30000, 15000, 10000]))
            .await
            .unwrap();

        assert_eq!(record.players.len(), 4);
        assert_eq!(record.players[0].rank, 1);
        assert_eq!(record.players[0].final_score, 65.0);

        // Players were registered on first appearance.
        assert_eq!(state.players.list().await.unwrap().len(), 4);
        // Winner earned their first-top badge.
        let winner_id = &record.players[0].player_id;
        assert_eq!(state.achievements.for_player(winner_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mismatched_score_sum_is_rejected_without_saving() {
        let state = test_state().await;
        let service = RecordService::from_state(&state);

        let result = service.save_round(request([45000, 30000, 15000, 9000])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(state.records.list().await.unwrap().is_empty());
        assert!(state.players.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_player_count_is_rejected() {
        let state = test_state().await;
        let service = RecordService::from_state(&state);

        let mut req = request([45000, 30000, 15000, 10000]);
        req.scores.pop();
        let result = service.save_round(req).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_then_settlements_reports_not_found() {
        let state = test_state().await;
        let service = RecordService::from_state(&state);

        let record = service
            .save_round(request([45000, 30000, 15000, 10000]))
            .await
            .unwrap();
        service.delete_record(&record.id).await.unwrap();

        let result = service.settlements(&record.id, 100.0).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn settlements_stay_within_transaction_bound() {
        let state = test_state().await;
        let service = RecordService::from_state(&state);

        let record = service
            .save_round(request([45000, 30000, 15000, 10000]))
            .await
            .unwrap();

        let payments = service.settlements(&record.id, 100.0).await.unwrap();
        assert!(!payments.is_empty());
        assert!(payments.len() <= 3);
    }
}
