use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered participant. Created on first appearance in any record
/// or session roster; names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    /// Creates a new player with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_players_get_distinct_ids() {
        let a = Player::new("Akira");
        let b = Player::new("Akira");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }
}
