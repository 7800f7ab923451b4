use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use crate::scoring::{GameExpense, RoundSettlement, RuleConfig};

/// Category tag for a free-text annotation on a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HighlightKind {
    Normal,
    Yakuman,
    Comeback,
    Other,
}

/// Free-text annotation attached to a game, optionally referencing the
/// player involved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHighlight {
    pub text: String,
    pub kind: HighlightKind,
    #[serde(default)]
    pub player_id: Option<String>,
}

/// One finalized round. The settled scores and the rule configuration
/// are copied in at creation and never change afterwards, even if the
/// default rules change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub players: Vec<RoundSettlement>,
    pub settings: RuleConfig,
    #[serde(default)]
    pub expenses: Vec<GameExpense>,
    #[serde(default)]
    pub highlights: Vec<GameHighlight>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl GameRecord {
    /// Creates a record for a just-settled round, stamped now
    pub fn new(players: Vec<RoundSettlement>, settings: RuleConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            players,
            settings,
            expenses: Vec::new(),
            highlights: Vec::new(),
            tags: Vec::new(),
            venue: None,
            session_id: None,
        }
    }

    /// The settled entry for one player, if they took part
    pub fn result_for(&self, player_id: &str) -> Option<&RoundSettlement> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}
