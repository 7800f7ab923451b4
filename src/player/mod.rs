// Public API - what other modules can use
pub use handlers::{create_player, list_players};
pub use models::Player;

mod handlers;
pub mod models;
pub mod repository;
