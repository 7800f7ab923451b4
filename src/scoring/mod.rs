// Public API - what other modules can use
pub use expense::{
    build_balances, settle_debts, GameExpense, NetBalance, Payment, PaymentMethod,
    DEFAULT_YEN_PER_POINT,
};
pub use ranks::resolve_ranks;
pub use settlement::{settle, RoundScore, RoundSettlement, RuleConfig, UmaPreset};

mod expense;
mod ranks;
mod settlement;
