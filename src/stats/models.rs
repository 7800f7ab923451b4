use serde::{Deserialize, Serialize};

use crate::achievement::Achievement;
use crate::record::models::GameRecord;

/// Aggregate statistics for one player over their whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: String,
    pub name: String,
    pub total_games: u32,
    /// Sum of final scores across all games
    pub total_points: f64,
    pub average_rank: f64,
    pub first_place_count: u32,
    pub second_place_count: u32,
    pub last_place_count: u32,
    pub first_place_rate: f64,
    pub top_two_rate: f64,
    pub not_last_rate: f64,
    pub yakuman_count: u32,
    pub achievements: Vec<Achievement>,
    /// Most recent games, newest first
    pub recent_games: Vec<GameRecord>,
}

/// Win/loss tally against one opponent across shared games. Equal
/// ranks count as neither a win nor a loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub opponent_id: String,
    pub opponent_name: String,
    pub wins: u32,
    pub losses: u32,
    /// Cumulative final-score gap, positive when ahead overall
    pub points_difference: f64,
}
