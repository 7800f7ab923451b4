use serde::Deserialize;

use crate::scoring::RuleConfig;

/// Request payload for starting a session: a name (optional, defaulted
/// from the date), exactly four player names, and the rules the whole
/// session will use.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub players: Vec<String>,
    #[serde(default)]
    pub settings: Option<RuleConfig>,
}

/// One player's reported raw score for a session round. Players are
/// identified by id; the roster is fixed, so no names are needed.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScoreEntry {
    pub player_id: String,
    pub raw_score: i32,
}

/// Request payload for recording one round in the active session
#[derive(Debug, Deserialize)]
pub struct RecordRoundRequest {
    pub scores: Vec<SessionScoreEntry>,
}
