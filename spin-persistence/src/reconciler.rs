use sea_orm::DatabaseConnection;

use crate::repositories::{SpinHistoryRepository, UserStatsRepository};
use spin_types::{LocalTotals, SpinHistoryEntry, SpinOutcome, UserIdentity, UserStats};

/// Remote side of the stats pipeline.
///
/// Every method absorbs storage failures: the error is logged and the call
/// yields `None` (or an empty list), so callers can keep playing locally.
pub struct StatsReconciler {
    stats: UserStatsRepository,
    history: SpinHistoryRepository,
}

impl StatsReconciler {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            stats: UserStatsRepository::new(db.clone()),
            history: SpinHistoryRepository::new(db),
        }
    }

    pub async fn get_stats(&self, user_id: &str) -> Option<UserStats> {
        if user_id.is_empty() {
            return None;
        }

        match self.stats.find_by_user_id(user_id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("Error fetching user stats for {}: {}", user_id, e);
                None
            }
        }
    }

    /// One-time max-merge of a device's totals into the remote record
    pub async fn merge_local_into_remote(
        &self,
        identity: &UserIdentity,
        local: &LocalTotals,
    ) -> Option<UserStats> {
        if identity.user_id.is_empty() {
            return None;
        }

        match self.stats.merge_local(identity, local).await {
            Ok(stats) => {
                tracing::info!(
                    "Merged local totals for {} ({} spins)",
                    identity.user_id,
                    stats.total_spins
                );
                Some(stats)
            }
            Err(e) => {
                tracing::error!("Error merging stats for {}: {}", identity.user_id, e);
                None
            }
        }
    }

    /// Per-spin additive update, keyed by the outcome's spin id
    pub async fn apply_increment(&self, user_id: &str, outcome: &SpinOutcome) -> Option<UserStats> {
        if user_id.is_empty() {
            return None;
        }

        match self.stats.apply_increment(user_id, outcome).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::error!("Error incrementing stats for {}: {}", user_id, e);
                None
            }
        }
    }

    pub async fn record_history(
        &self,
        user_id: &str,
        outcome: &SpinOutcome,
    ) -> Option<SpinHistoryEntry> {
        if user_id.is_empty() {
            return None;
        }

        match self.history.record(user_id, outcome).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Error recording spin {}: {}", outcome.spin_id, e);
                None
            }
        }
    }

    /// Increment the totals, then append to the history log. The history
    /// write is best effort and never affects the returned stats.
    pub async fn record_spin(&self, user_id: &str, outcome: &SpinOutcome) -> Option<UserStats> {
        let stats = self.apply_increment(user_id, outcome).await;
        self.record_history(user_id, outcome).await;
        stats
    }

    pub async fn spin_history(&self, user_id: &str, limit: u64) -> Vec<SpinHistoryEntry> {
        if user_id.is_empty() {
            return Vec::new();
        }

        self.history
            .recent(user_id, limit)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Error fetching spin history for {}: {}", user_id, e);
                Vec::new()
            })
    }
}
