use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use super::models::{GameSession, SessionStanding};
use super::repository::SessionRepository;
use super::types::{RecordRoundRequest, StartSessionRequest};
use crate::notification::{Notification, NotificationBus, Severity};
use crate::player::repository::PlayerRepository;
use crate::player::Player;
use crate::record::models::GameRecord;
use crate::record::service::{RecordService, TABLE_SIZE};
use crate::scoring::{settle, RoundScore};
use crate::shared::{AppError, AppState};

/// Service for the session lifecycle: start, record rounds, summarize,
/// complete, delete. The single-active-session invariant itself lives
/// in the repository; this layer validates input and wires records and
/// notifications in.
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    players: Arc<dyn PlayerRepository>,
    records: RecordService,
    notifications: NotificationBus,
}

impl SessionService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            sessions: Arc::clone(&state.sessions),
            players: Arc::clone(&state.players),
            records: RecordService::from_state(state),
            notifications: state.notifications.clone(),
        }
    }

    /// Starts a new session with a fixed roster of exactly four
    /// distinct players, creating unregistered ones by name. Fails
    /// without side effects while another session is active.
    #[instrument(skip(self, request))]
    pub async fn start_session(
        &self,
        request: StartSessionRequest,
    ) -> Result<GameSession, AppError> {
        let names: Vec<String> = request
            .players
            .iter()
            .map(|n| n.trim().to_string())
            .collect();

        if names.len() != TABLE_SIZE {
            return Err(AppError::Validation(format!(
                "A session needs exactly {} players, got {}",
                TABLE_SIZE,
                names.len()
            )));
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(AppError::Validation(
                "Every player needs a non-empty name".to_string(),
            ));
        }
        let distinct: HashSet<&String> = names.iter().collect();
        if distinct.len() != names.len() {
            return Err(AppError::Validation(
                "Players in a session must be distinct".to_string(),
            ));
        }

        // Refuse early so no players get created for a doomed start.
        if self.sessions.active().await?.is_some() {
            return Err(AppError::SessionAlreadyActive);
        }

        let mut roster: Vec<Player> = Vec::with_capacity(TABLE_SIZE);
        for name in &names {
            roster.push(self.players.get_or_create(name).await?);
        }

        let name = request.name.filter(|n| !n.trim().is_empty()).or_else(|| {
            Some(format!("Session {}", chrono::Utc::now().format("%Y-%m-%d")))
        });
        let settings = request.settings.unwrap_or_default();

        let session = self
            .sessions
            .try_start(GameSession::new(name, roster, settings))
            .await?;

        info!(session_id = %session.id, "Session started");
        self.notifications.emit(Notification::new(
            "Session started",
            format!("\"{}\" is under way", session.name.as_deref().unwrap_or("")),
            Severity::Success,
        ));
        Ok(session)
    }

    /// Settles and records one round for the active session: builds the
    /// game record, appends it to the session and advances the round
    /// counter. Any validation failure is an atomic no-op.
    #[instrument(skip(self, request))]
    pub async fn record_round(
        &self,
        request: RecordRoundRequest,
    ) -> Result<(GameSession, GameRecord), AppError> {
        let mut session = self
            .sessions
            .active()
            .await?
            .ok_or(AppError::NoActiveSession)?;

        if request.scores.len() != TABLE_SIZE {
            return Err(AppError::Validation(format!(
                "A round needs exactly {} scores, got {}",
                TABLE_SIZE,
                request.scores.len()
            )));
        }

        let mut scores: Vec<RoundScore> = Vec::with_capacity(TABLE_SIZE);
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &request.scores {
            let Some(player) = session.players.iter().find(|p| p.id == entry.player_id) else {
                return Err(AppError::Validation(format!(
                    "Player {} is not in this session's roster",
                    entry.player_id
                )));
            };
            if !seen.insert(&entry.player_id) {
                return Err(AppError::Validation(format!(
                    "Duplicate score entry for player {}",
                    entry.player_id
                )));
            }
            scores.push(RoundScore {
                player_id: player.id.clone(),
                name: player.name.clone(),
                raw_score: entry.raw_score,
            });
        }

        let total: i32 = scores.iter().map(|s| s.raw_score).sum();
        let expected = session.settings.starting_points * TABLE_SIZE as i32;
        if total != expected {
            return Err(AppError::Validation(format!(
                "Raw scores sum to {} but must sum to {}",
                total, expected
            )));
        }

        let mut record = GameRecord::new(settle(&scores, &session.settings), session.settings);
        record.session_id = Some(session.id.clone());
        let record = self.records.add_record(record).await?;

        let round = session.current_round;
        session.game_records_in_session.push(record.clone());
        session.current_round += 1;
        self.sessions.update_active(session.clone()).await?;

        info!(
            session_id = %session.id,
            round = round,
            record_id = %record.id,
            "Round recorded"
        );
        self.notifications.emit(Notification::new(
            format!("Round {} recorded", round),
            "On to the next round".to_string(),
            Severity::Primary,
        ));
        Ok((session, record))
    }

    /// The active session's running standings; `None` before the first
    /// recorded round
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<Option<Vec<SessionStanding>>, AppError> {
        let session = self
            .sessions
            .active()
            .await?
            .ok_or(AppError::NoActiveSession)?;
        Ok(session.summary())
    }

    #[instrument(skip(self))]
    pub async fn complete_session(&self) -> Result<GameSession, AppError> {
        let session = self.sessions.complete_active().await?;

        info!(session_id = %session.id, rounds = session.rounds_recorded(), "Session completed");
        self.notifications.emit(Notification::new(
            "Session completed",
            format!("\"{}\" has ended", session.name.as_deref().unwrap_or("")),
            Severity::Success,
        ));
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        self.sessions.delete(session_id).await?;

        info!(session_id = %session_id, "Session deleted");
        self.notifications.emit(Notification::new(
            "Session deleted",
            String::new(),
            Severity::Warning,
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::SessionScoreEntry;
    use crate::shared::test_utils::test_state;

    fn start_request(names: &[&str]) -> StartSessionRequest {
        StartSessionRequest {
            name: Some("Test session".to_string()),
            players: names.iter().map(|n| n.to_string()).collect(),
            settings: None,
        }
    }

    fn round_request(session: &GameSession, raw_scores: [i32; 4]) -> RecordRoundRequest {
        RecordRoundRequest {
            scores: session
                .players
                .iter()
                .zip(raw_scores)
                .map(|(p, raw_score)| SessionScoreEntry {
                    player_id: p.id.clone(),
                    raw_score,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn full_session_lifecycle() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);

        let session = service
            .start_session(start_request(&["Akira", "Kana", "Ren", "Sora"]))
            .await
            .unwrap();
        assert_eq!(session.current_round, 1);
        assert!(service.summary().await.unwrap().is_none());

        let (session, record) = service
            .record_round(round_request(&session, [45000, 30000, 15000, 10000]))
            .await
            .unwrap();
        assert_eq!(session.current_round, 2);
        assert_eq!(record.session_id.as_deref(), Some(session.id.as_str()));

        let standings = service.summary().await.unwrap().unwrap();
        assert_eq!(standings[0].name, "Akira");
        assert_eq!(standings[0].total_final_score, 65.0);
        assert_eq!(standings[0].rank, 1);

        let completed = service.complete_session().await.unwrap();
        assert_eq!(completed.rounds_recorded(), 1);
        assert!(state.sessions.active().await.unwrap().is_none());

        // The round's record outlives the session.
        assert_eq!(state.records.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_roster_names_are_rejected() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);

        let result = service
            .start_session(start_request(&["Akira", "Akira", "Ren", "Sora"]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(state.players.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn starting_twice_fails_and_preserves_the_first() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);

        let first = service
            .start_session(start_request(&["Akira", "Kana", "Ren", "Sora"]))
            .await
            .unwrap();

        let result = service
            .start_session(start_request(&["E", "F", "G", "H"]))
            .await;
        assert!(matches!(result, Err(AppError::SessionAlreadyActive)));

        let active = state.sessions.active().await.unwrap().unwrap();
        assert_eq!(active, first);
        // The doomed start created no players either.
        assert_eq!(state.players.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn round_for_unknown_player_is_rejected_without_mutation() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);

        let session = service
            .start_session(start_request(&["Akira", "Kana", "Ren", "Sora"]))
            .await
            .unwrap();

        let mut request = round_request(&session, [45000, 30000, 15000, 10000]);
        request.scores[0].player_id = "stranger".to_string();
        let result = service.record_round(request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let active = state.sessions.active().await.unwrap().unwrap();
        assert_eq!(active.current_round, 1);
        assert!(state.records.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_round_without_active_session_fails() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);

        let result = service
            .record_round(RecordRoundRequest { scores: Vec::new() })
            .await;
        assert!(matches!(result, Err(AppError::NoActiveSession)));
    }

    #[tokio::test]
    async fn deleting_a_session_round_record_steps_the_counter_back() {
        let state = test_state().await;
        let service = SessionService::from_state(&state);
        let records = RecordService::from_state(&state);

        let session = service
            .start_session(start_request(&["Akira", "Kana", "Ren", "Sora"]))
            .await
            .unwrap();
        let (session, record) = service
            .record_round(round_request(&session, [45000, 30000, 15000, 10000]))
            .await
            .unwrap();
        assert_eq!(session.current_round, 2);

        records.delete_record(&record.id).await.unwrap();

        let active = state.sessions.active().await.unwrap().unwrap();
        assert_eq!(active.current_round, 1);
        assert!(active.game_records_in_session.is_empty());
    }
}
