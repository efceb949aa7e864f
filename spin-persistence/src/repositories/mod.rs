pub mod notification_repository;
pub mod spin_history_repository;
pub mod user_stats_repository;

pub use notification_repository::{NotificationHistoryRecord, NotificationRepository};
pub use spin_history_repository::SpinHistoryRepository;
pub use user_stats_repository::UserStatsRepository;
