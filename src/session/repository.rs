use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{GameSession, SessionStatus};
use crate::shared::AppError;
use crate::storage::{keys, KeyValueStore};

/// Trait for session repository operations. The repository owns the
/// "at most one active session" invariant: every state transition is
/// checked and applied under one lock, so a rejected operation leaves
/// everything untouched.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// The active session, if any
    async fn active(&self) -> Result<Option<GameSession>, AppError>;

    /// Completed sessions, newest first
    async fn list(&self) -> Result<Vec<GameSession>, AppError>;

    /// Atomically installs `session` as the active one. Fails with
    /// `SessionAlreadyActive` without touching the current session.
    async fn try_start(&self, session: GameSession) -> Result<GameSession, AppError>;

    /// Replaces the active session (round appended etc.). Fails with
    /// `NoActiveSession` when there is none.
    async fn update_active(&self, session: GameSession) -> Result<(), AppError>;

    /// Atomically completes the active session: stamps the end date,
    /// moves it into the historical collection, clears the active slot.
    async fn complete_active(&self) -> Result<GameSession, AppError>;

    /// Deletes a session by id, whether active or historical
    async fn delete(&self, session_id: &str) -> Result<(), AppError>;

    /// Drops a deleted game record from the active session, stepping
    /// the round counter back (never below 1). Returns whether the
    /// active session was referencing the record.
    async fn detach_record(&self, record_id: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Default)]
struct SessionState {
    active: Option<GameSession>,
    history: Vec<GameSession>,
}

/// Store-backed implementation. The active session and the historical
/// collection live under separate keys; both are written through on
/// every mutation while one lock keeps the pair consistent.
pub struct StoreSessionRepository {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl StoreSessionRepository {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let history = match store.load(keys::GAME_SESSIONS).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Session collection failed to decode, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let active = match store.load(keys::ACTIVE_SESSION).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Active session failed to decode, treating as none");
                None
            }),
            None => None,
        };
        debug!(
            history = history.len(),
            has_active = active.is_some(),
            "Loaded session collections"
        );

        Ok(Self {
            store,
            state: RwLock::new(SessionState { active, history }),
        })
    }

    async fn persist_active(&self, active: &Option<GameSession>) -> Result<(), AppError> {
        match active {
            Some(session) => {
                let value = serde_json::to_value(session)
                    .map_err(|e| AppError::Storage(format!("encoding active session: {}", e)))?;
                self.store.save(keys::ACTIVE_SESSION, value).await
            }
            None => self.store.remove(keys::ACTIVE_SESSION).await,
        }
    }

    async fn persist_history(&self, history: &[GameSession]) -> Result<(), AppError> {
        let value = serde_json::to_value(history)
            .map_err(|e| AppError::Storage(format!("encoding sessions: {}", e)))?;
        self.store.save(keys::GAME_SESSIONS, value).await
    }
}

#[async_trait]
impl SessionRepository for StoreSessionRepository {
    #[instrument(skip(self))]
    async fn active(&self) -> Result<Option<GameSession>, AppError> {
        Ok(self.state.read().await.active.clone())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<GameSession>, AppError> {
        Ok(self.state.read().await.history.clone())
    }

    #[instrument(skip(self, session))]
    async fn try_start(&self, session: GameSession) -> Result<GameSession, AppError> {
        let mut state = self.state.write().await;
        if state.active.is_some() {
            debug!("Rejecting session start, another session is active");
            return Err(AppError::SessionAlreadyActive);
        }

        state.active = Some(session.clone());
        self.persist_active(&state.active).await?;
        debug!(session_id = %session.id, "Session started");
        Ok(session)
    }

    #[instrument(skip(self, session))]
    async fn update_active(&self, session: GameSession) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if state.active.is_none() {
            return Err(AppError::NoActiveSession);
        }
        state.active = Some(session);
        self.persist_active(&state.active).await
    }

    #[instrument(skip(self))]
    async fn complete_active(&self) -> Result<GameSession, AppError> {
        let mut state = self.state.write().await;
        let mut session = state.active.take().ok_or(AppError::NoActiveSession)?;

        session.status = SessionStatus::Completed;
        session.end_date = Some(Utc::now());

        state.history.push(session.clone());
        state.history.sort_by(|a, b| b.start_date.cmp(&a.start_date));

        self.persist_history(&state.history).await?;
        self.persist_active(&state.active).await?;
        debug!(session_id = %session.id, "Session completed");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        if state.active.as_ref().is_some_and(|s| s.id == session_id) {
            state.active = None;
            self.persist_active(&state.active).await?;
            debug!(session_id = %session_id, "Active session deleted");
            return Ok(());
        }

        let before = state.history.len();
        state.history.retain(|s| s.id != session_id);
        if state.history.len() == before {
            return Err(AppError::NotFound(format!("Session {}", session_id)));
        }
        self.persist_history(&state.history).await?;
        debug!(session_id = %session_id, "Session deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn detach_record(&self, record_id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let Some(session) = state.active.as_mut() else {
            return Ok(false);
        };

        let before = session.game_records_in_session.len();
        session.game_records_in_session.retain(|r| r.id != record_id);
        if session.game_records_in_session.len() == before {
            return Ok(false);
        }

        session.current_round = session.current_round.saturating_sub(1).max(1);
        self.persist_active(&state.active).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::scoring::RuleConfig;
    use crate::storage::InMemoryStore;

    fn roster() -> Vec<Player> {
        ["Akira", "Kana", "Ren", "Sora"]
            .iter()
            .map(|name| Player {
                id: format!("id-{}", name),
                name: name.to_string(),
            })
            .collect()
    }

    fn session(name: &str) -> GameSession {
        GameSession::new(Some(name.to_string()), roster(), RuleConfig::default())
    }

    async fn repo() -> StoreSessionRepository {
        StoreSessionRepository::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn second_start_fails_and_leaves_first_untouched() {
        let repo = repo().await;
        let first = repo.try_start(session("first")).await.unwrap();

        let result = repo.try_start(session("second")).await;
        assert!(matches!(result, Err(AppError::SessionAlreadyActive)));

        let active = repo.active().await.unwrap().unwrap();
        assert_eq!(active.id, first.id);
        assert_eq!(active.name.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn complete_moves_session_into_history() {
        let repo = repo().await;
        repo.try_start(session("evening")).await.unwrap();

        let completed = repo.complete_active().await.unwrap();
        assert_eq!(completed.status, SessionStatus::Completed);
        assert!(completed.end_date.is_some());

        assert!(repo.active().await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);

        // With the slot free a new session can start.
        repo.try_start(session("late night")).await.unwrap();
    }

    #[tokio::test]
    async fn complete_without_active_session_fails() {
        let repo = repo().await;
        let result = repo.complete_active().await;
        assert!(matches!(result, Err(AppError::NoActiveSession)));
    }

    #[tokio::test]
    async fn delete_clears_active_or_history() {
        let repo = repo().await;
        let active = repo.try_start(session("a")).await.unwrap();
        repo.delete(&active.id).await.unwrap();
        assert!(repo.active().await.unwrap().is_none());

        repo.try_start(session("b")).await.unwrap();
        let completed = repo.complete_active().await.unwrap();
        repo.delete(&completed.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        let result = repo.delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn state_survives_a_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        let repo = StoreSessionRepository::load(Arc::clone(&store)).await.unwrap();
        let started = repo.try_start(session("persisted")).await.unwrap();

        let reloaded = StoreSessionRepository::load(store).await.unwrap();
        let active = reloaded.active().await.unwrap().unwrap();
        assert_eq!(active, started);
    }
}
