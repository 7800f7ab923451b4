use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title of the badge for a player's first ever rank-1 finish
pub const FIRST_TOP_TITLE: &str = "First Top";

/// Title of the badge unlocked by a yakuman highlight
pub const YAKUMAN_TITLE: &str = "Yakuman";

/// An unlocked badge. Append-only, produced as a side effect of saving
/// a game record, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub player_id: String,
    pub title: String,
    pub description: String,
    /// iconify icon name, e.g. "lucide:trophy"
    pub icon: String,
    pub date: DateTime<Utc>,
}

impl Achievement {
    pub fn first_top(player_id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id: player_id.into(),
            title: FIRST_TOP_TITLE.to_string(),
            description: "Finished first for the first time".to_string(),
            icon: "lucide:trophy".to_string(),
            date,
        }
    }

    pub fn yakuman(
        player_id: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let description = description.into();
        Self {
            id: Uuid::new_v4().to_string(),
            player_id: player_id.into(),
            title: YAKUMAN_TITLE.to_string(),
            description: if description.is_empty() {
                "Completed a yakuman hand".to_string()
            } else {
                description
            },
            icon: "lucide:sparkles".to_string(),
            date,
        }
    }
}
