pub mod prelude;

pub mod applied_spins;
pub mod notification_history;
pub mod notification_tokens;
pub mod spin_history;
pub mod user_stats;
