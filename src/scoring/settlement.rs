use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::ranks::resolve_ranks;

/// Placement-bonus ("uma") presets. Each selects a fixed 4-entry table
/// of bonuses indexed by finishing rank, symmetric around zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum UmaPreset {
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    None,
    #[serde(rename = "5-10")]
    #[strum(serialize = "5-10")]
    FiveTen,
    #[serde(rename = "10-20")]
    #[strum(serialize = "10-20")]
    TenTwenty,
    #[serde(rename = "10-30")]
    #[strum(serialize = "10-30")]
    TenThirty,
    #[serde(rename = "20-40")]
    #[strum(serialize = "20-40")]
    TwentyForty,
}

impl UmaPreset {
    /// The bonus table for ranks 1 through 4
    pub fn table(&self) -> [f64; 4] {
        match self {
            UmaPreset::None => [0.0, 0.0, 0.0, 0.0],
            UmaPreset::FiveTen => [10.0, 5.0, -5.0, -10.0],
            UmaPreset::TenTwenty => [20.0, 10.0, -10.0, -20.0],
            UmaPreset::TenThirty => [30.0, 10.0, -10.0, -30.0],
            UmaPreset::TwentyForty => [40.0, 20.0, -20.0, -40.0],
        }
    }

    /// Bonus for a 1-based rank; rank 0 and ranks beyond the table yield 0
    pub fn bonus_for_rank(&self, rank: u32) -> f64 {
        if rank == 0 {
            return 0.0;
        }
        self.table()
            .get(rank as usize - 1)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Rule configuration for one round or session. Stored by value on
/// every record, so later changes to the defaults never retroactively
/// alter history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub starting_points: i32,
    pub return_points: i32,
    pub uma: UmaPreset,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            starting_points: 25000,
            return_points: 30000,
            uma: UmaPreset::TenThirty,
        }
    }
}

impl RuleConfig {
    /// Total pot bonus ("oka") collected by the top finisher: the gap
    /// between return and starting points, over the whole table.
    pub fn pot_bonus_total(&self, player_count: usize) -> f64 {
        ((self.return_points - self.starting_points) * player_count as i32) as f64 / 1000.0
    }
}

/// Raw per-player input for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundScore {
    pub player_id: String,
    pub name: String,
    pub raw_score: i32,
}

/// Settled per-player result for one round. Computed once when the
/// round is finalized and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSettlement {
    pub player_id: String,
    pub name: String,
    pub raw_score: i32,
    pub rank: u32,
    pub placement_bonus: f64,
    pub pot_bonus: f64,
    pub final_score: f64,
}

/// Applies the scoring formula to a round of raw scores.
///
/// Per player: `(raw - return_points) / 1000` plus the uma bonus for
/// the resolved rank, with the whole pot bonus going to rank 1. The
/// results sum to zero whenever the raw scores sum to
/// `starting_points * player_count`; the caller is responsible for
/// validating that closed-table constraint.
pub fn settle(scores: &[RoundScore], config: &RuleConfig) -> Vec<RoundSettlement> {
    let ranks = resolve_ranks(scores, |s| s.raw_score as f64);
    let pot_bonus_total = config.pot_bonus_total(scores.len());

    scores
        .iter()
        .zip(ranks)
        .map(|(score, rank)| {
            let adjustment = (score.raw_score - config.return_points) as f64 / 1000.0;
            let placement_bonus = config.uma.bonus_for_rank(rank);
            let pot_bonus = if rank == 1 { pot_bonus_total } else { 0.0 };

            RoundSettlement {
                player_id: score.player_id.clone(),
                name: score.name.clone(),
                raw_score: score.raw_score,
                rank,
                placement_bonus,
                pot_bonus,
                final_score: adjustment + placement_bonus + pot_bonus,
            }
        })
        .collect()
}
