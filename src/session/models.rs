use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use crate::player::Player;
use crate::record::models::GameRecord;
use crate::scoring::{resolve_ranks, RuleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// An open-ended run of rounds played by the same four players under
/// one rule configuration. The roster and settings are frozen at
/// creation; only the record list, round counter, status and end date
/// ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub players: Vec<Player>,
    pub settings: RuleConfig,
    pub game_records_in_session: Vec<GameRecord>,
    pub status: SessionStatus,
    /// 1-based number of the round about to be played
    pub current_round: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// One player's aggregate standing within a session. Distinct from the
/// per-round settlement shape: placement and pot bonuses have no
/// meaning at this level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStanding {
    pub player_id: String,
    pub name: String,
    pub total_raw_score: i64,
    pub total_final_score: f64,
    pub games_played: u32,
    pub rank: u32,
}

impl GameSession {
    pub fn new(name: Option<String>, players: Vec<Player>, settings: RuleConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_date: Utc::now(),
            end_date: None,
            players,
            settings,
            game_records_in_session: Vec::new(),
            status: SessionStatus::Active,
            current_round: 1,
            name,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Rounds recorded so far
    pub fn rounds_recorded(&self) -> usize {
        self.game_records_in_session.len()
    }

    /// Folds the recorded rounds into per-player totals re-ranked by
    /// cumulative final score. Recomputed from the record list on every
    /// call, so it is idempotent and needs no cached state. `None`
    /// until the first round is recorded.
    pub fn summary(&self) -> Option<Vec<SessionStanding>> {
        if self.game_records_in_session.is_empty() {
            return None;
        }

        let mut standings: Vec<SessionStanding> = self
            .players
            .iter()
            .map(|p| SessionStanding {
                player_id: p.id.clone(),
                name: p.name.clone(),
                total_raw_score: 0,
                total_final_score: 0.0,
                games_played: 0,
                rank: 0,
            })
            .collect();

        for record in &self.game_records_in_session {
            for result in &record.players {
                if let Some(standing) = standings
                    .iter_mut()
                    .find(|s| s.player_id == result.player_id)
                {
                    standing.total_raw_score += result.raw_score as i64;
                    standing.total_final_score += result.final_score;
                    standing.games_played += 1;
                }
            }
        }

        let ranks = resolve_ranks(&standings, |s| s.total_final_score);
        for (standing, rank) in standings.iter_mut().zip(ranks) {
            standing.rank = rank;
        }
        standings.sort_by_key(|s| s.rank);

        Some(standings)
    }
}
