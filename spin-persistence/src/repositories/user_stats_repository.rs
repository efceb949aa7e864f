use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};

use crate::entities::{applied_spins, prelude::*, user_stats};
use spin_types::{LocalTotals, SpinOutcome, UserIdentity};

/// Rows of `user_stats`, one per user id
pub struct UserStatsRepository {
    db: DatabaseConnection,
}

impl UserStatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_stats(model: user_stats::Model) -> spin_types::UserStats {
        spin_types::UserStats {
            user_id: model.user_id,
            username: model.username,
            avatar_url: model.pfp_url,
            total_spins: model.total_spins,
            total_wins: model.total_wins,
            total_usdc: model.total_usdc,
            total_points: model.total_points,
        }
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<spin_types::UserStats>> {
        let model = UserStats::find_by_id(user_id.to_string()).one(&self.db).await?;
        Ok(model.map(Self::model_to_stats))
    }

    /// Insert or overwrite the record for `stats.user_id`
    pub async fn upsert(&self, stats: &spin_types::UserStats) -> Result<spin_types::UserStats> {
        Self::write(&self.db, stats).await?;
        self.fetch(&self.db, &stats.user_id).await
    }

    /// One-time device migration: counters become the max of local and remote
    pub async fn merge_local(
        &self,
        identity: &UserIdentity,
        local: &LocalTotals,
    ) -> Result<spin_types::UserStats> {
        let txn = self.db.begin().await?;

        let remote = UserStats::find_by_id(identity.user_id.clone())
            .one(&txn)
            .await?
            .map(Self::model_to_stats);

        let merged = spin_core::merge_local_into_remote(identity, local, remote.as_ref());
        Self::write(&txn, &merged).await?;
        let saved = self.fetch(&txn, &identity.user_id).await?;

        txn.commit().await?;
        Ok(saved)
    }

    /// Add one resolved spin. The spin id is claimed in `applied_spins` in
    /// the same transaction, so any spin id is counted at most once no
    /// matter how often or in which order it is replayed.
    pub async fn apply_increment(
        &self,
        user_id: &str,
        outcome: &SpinOutcome,
    ) -> Result<spin_types::UserStats> {
        let spin_id = outcome.spin_id.to_string();
        let txn = self.db.begin().await?;

        let claimed = AppliedSpins::insert(applied_spins::ActiveModel {
            spin_id: ActiveValue::Set(spin_id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            applied_at: ActiveValue::Set(chrono::Utc::now().into()),
        })
        .on_conflict(
            OnConflict::column(applied_spins::Column::SpinId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let current = UserStats::find_by_id(user_id.to_string())
            .one(&txn)
            .await?
            .map(Self::model_to_stats)
            .unwrap_or_else(|| spin_types::UserStats::empty(&UserIdentity::new(user_id)));

        if claimed == 0 {
            tracing::debug!("Spin {} already applied, skipping increment", spin_id);
            txn.commit().await?;
            return Ok(current);
        }

        let updated = spin_core::apply_increment(&current, outcome);
        Self::write(&txn, &updated).await?;
        let saved = self.fetch(&txn, user_id).await?;

        txn.commit().await?;
        Ok(saved)
    }

    async fn fetch<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<spin_types::UserStats> {
        let model = UserStats::find_by_id(user_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve stats for {}", user_id))?;
        Ok(Self::model_to_stats(model))
    }

    async fn write<C: ConnectionTrait>(
        conn: &C,
        stats: &spin_types::UserStats,
    ) -> Result<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let model = user_stats::ActiveModel {
            user_id: ActiveValue::Set(stats.user_id.clone()),
            username: ActiveValue::Set(stats.username.clone()),
            pfp_url: ActiveValue::Set(stats.avatar_url.clone()),
            total_spins: ActiveValue::Set(stats.total_spins),
            total_wins: ActiveValue::Set(stats.total_wins),
            total_usdc: ActiveValue::Set(stats.total_usdc),
            total_points: ActiveValue::Set(stats.total_points),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        UserStats::insert(model)
            .on_conflict(
                OnConflict::column(user_stats::Column::UserId)
                    .update_columns([
                        user_stats::Column::Username,
                        user_stats::Column::PfpUrl,
                        user_stats::Column::TotalSpins,
                        user_stats::Column::TotalWins,
                        user_stats::Column::TotalUsdc,
                        user_stats::Column::TotalPoints,
                        user_stats::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }
}
