pub use super::applied_spins::Entity as AppliedSpins;
pub use super::notification_history::Entity as NotificationHistory;
pub use super::notification_tokens::Entity as NotificationTokens;
pub use super::spin_history::Entity as SpinHistory;
pub use super::user_stats::Entity as UserStats;
