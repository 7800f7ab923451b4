// Public API - what other modules can use
pub use handlers::{
    active_session, complete_session, delete_session, list_sessions, record_round, session_summary,
    start_session, summary_share_text,
};
pub use models::{GameSession, SessionStanding, SessionStatus};
pub use service::SessionService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
