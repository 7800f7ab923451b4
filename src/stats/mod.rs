// Public API - what other modules can use
pub use handlers::{head_to_head, player_stats};
pub use models::{HeadToHeadRecord, PlayerStats};
pub use service::StatsService;

mod handlers;
pub mod models;
mod service;
