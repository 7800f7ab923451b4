use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::models::{HeadToHeadRecord, PlayerStats};
use crate::achievement::repository::AchievementRepository;
use crate::achievement::YAKUMAN_TITLE;
use crate::player::repository::PlayerRepository;
use crate::record::models::GameRecord;
use crate::record::repository::RecordRepository;
use crate::shared::{AppError, AppState};

/// How many of the latest games to echo back with the stats
const RECENT_GAMES: usize = 20;

/// Read-only aggregation over the saved history: per-player statistics
/// and head-to-head comparisons. Nothing here mutates state.
pub struct StatsService {
    records: Arc<dyn RecordRepository>,
    achievements: Arc<dyn AchievementRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl StatsService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            records: Arc::clone(&state.records),
            achievements: Arc::clone(&state.achievements),
            players: Arc::clone(&state.players),
        }
    }

    /// Aggregates one player's history; `None` when they have no games
    #[instrument(skip(self))]
    pub async fn player_stats(&self, player_id: &str) -> Result<Option<PlayerStats>, AppError> {
        let player = self
            .players
            .get(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {}", player_id)))?;

        let player_games: Vec<GameRecord> = self
            .records
            .list()
            .await?
            .into_iter()
            .filter(|r| r.result_for(player_id).is_some())
            .collect();
        if player_games.is_empty() {
            return Ok(None);
        }

        let mut total_points = 0.0;
        let mut total_rank = 0u32;
        let mut first_place_count = 0u32;
        let mut second_place_count = 0u32;
        let mut last_place_count = 0u32;

        for game in &player_games {
            let Some(result) = game.result_for(player_id) else {
                continue;
            };
            total_points += result.final_score;
            total_rank += result.rank;

            let bottom_rank = game.players.len() as u32;
            if result.rank == 1 {
                first_place_count += 1;
            }
            if result.rank == 2 {
                second_place_count += 1;
            }
            if result.rank == bottom_rank {
                last_place_count += 1;
            }
        }

        let games = player_games.len() as u32;
        let achievements = self.achievements.for_player(player_id).await?;
        let yakuman_count = achievements
            .iter()
            .filter(|a| a.title == YAKUMAN_TITLE)
            .count() as u32;

        Ok(Some(PlayerStats {
            player_id: player.id,
            name: player.name,
            total_games: games,
            total_points,
            average_rank: total_rank as f64 / games as f64,
            first_place_count,
            second_place_count,
            last_place_count,
            first_place_rate: first_place_count as f64 / games as f64,
            top_two_rate: (first_place_count + second_place_count) as f64 / games as f64,
            not_last_rate: (games - last_place_count) as f64 / games as f64,
            yakuman_count,
            achievements,
            recent_games: player_games.into_iter().take(RECENT_GAMES).collect(),
        }))
    }

    /// Win/loss/points tallies against every opponent the player has
    /// shared a table with, sorted by games played together
    #[instrument(skip(self))]
    pub async fn head_to_head(&self, player_id: &str) -> Result<Vec<HeadToHeadRecord>, AppError> {
        let records = self.records.list().await?;

        let mut opponents: HashMap<String, HeadToHeadRecord> = HashMap::new();
        for game in &records {
            let Some(own) = game.result_for(player_id) else {
                continue;
            };

            for opponent in game.players.iter().filter(|p| p.player_id != player_id) {
                let entry = opponents
                    .entry(opponent.player_id.clone())
                    .or_insert_with(|| HeadToHeadRecord {
                        opponent_id: opponent.player_id.clone(),
                        opponent_name: opponent.name.clone(),
                        wins: 0,
                        losses: 0,
                        points_difference: 0.0,
                    });

                if own.rank < opponent.rank {
                    entry.wins += 1;
                } else if own.rank > opponent.rank {
                    entry.losses += 1;
                }
                entry.points_difference += own.final_score - opponent.final_score;
            }
        }

        let mut head_to_head: Vec<HeadToHeadRecord> = opponents.into_values().collect();
        head_to_head.sort_by(|a, b| (b.wins + b.losses).cmp(&(a.wins + a.losses)));
        Ok(head_to_head)
    }
}
