// Public API - what other modules can use
pub use handlers::{list_achievements, player_achievements};
pub use models::{Achievement, FIRST_TOP_TITLE, YAKUMAN_TITLE};
pub use service::AchievementService;

mod handlers;
pub mod models;
pub mod repository;
mod service;
