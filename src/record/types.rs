use serde::Deserialize;

use super::models::GameHighlight;
use crate::scoring::{GameExpense, RuleConfig};

/// One player's reported raw score. The id may be omitted for players
/// not registered yet; they are created from the denormalized name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScoreEntry {
    #[serde(default)]
    pub player_id: Option<String>,
    pub name: String,
    pub raw_score: i32,
}

/// Request payload for saving a standalone (non-session) round
#[derive(Debug, Deserialize)]
pub struct SaveRoundRequest {
    pub scores: Vec<RawScoreEntry>,
    /// Defaults to the standard 25000/30000 uma 10-30 rules
    #[serde(default)]
    pub settings: Option<RuleConfig>,
    #[serde(default)]
    pub expenses: Vec<GameExpense>,
    #[serde(default)]
    pub highlights: Vec<GameHighlight>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub venue: Option<String>,
}
