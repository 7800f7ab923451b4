// Public API - what other modules can use
pub use handlers::{
    delete_record, get_record, list_records, record_settlements, record_share_text, save_round,
    update_record,
};
pub use models::{GameRecord, GameHighlight, HighlightKind};
pub use service::RecordService;

mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
