// Public API - what other modules can use
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

mod json_file;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::AppError;

/// Narrow persistence interface the domain repositories are built on.
/// Each top-level collection (players, game records, sessions,
/// achievements, active session) lives under its own key and is
/// saved/loaded as one JSON document.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the document stored under `key`, or `None` if absent.
    /// Corrupt content must surface as `None`, never as an error.
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError>;

    /// Stores `value` under `key`, replacing any previous document.
    async fn save(&self, key: &str, value: Value) -> Result<(), AppError>;

    /// Removes the document under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Storage keys for each persisted collection
pub mod keys {
    pub const PLAYERS: &str = "mahjong-players";
    pub const GAME_RECORDS: &str = "mahjong-game-records";
    pub const ACHIEVEMENTS: &str = "mahjong-achievements";
    pub const GAME_SESSIONS: &str = "mahjong-game-sessions";
    pub const ACTIVE_SESSION: &str = "mahjong-active-session";
}
