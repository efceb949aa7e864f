use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{prelude::*, spin_history};
use spin_types::{ResultType, SpinHistoryEntry, SpinOutcome};

/// Append-only log of resolved spins
pub struct SpinHistoryRepository {
    db: DatabaseConnection,
}

impl SpinHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_entry(model: spin_history::Model) -> Result<SpinHistoryEntry> {
        let result_type = ResultType::parse(&model.result_type)
            .ok_or_else(|| anyhow::anyhow!("Unknown result type: {}", model.result_type))?;

        Ok(SpinHistoryEntry {
            spin_id: Uuid::parse_str(&model.spin_id)?,
            user_id: model.user_id,
            result_type,
            amount: model.amount,
            segment_name: model.segment_name,
            points_earned: model.points_earned,
            created_at: model.created_at.to_rfc3339(),
        })
    }

    /// Append one entry. An entry for the same spin id is never written twice.
    pub async fn record(&self, user_id: &str, outcome: &SpinOutcome) -> Result<SpinHistoryEntry> {
        let spin_id = outcome.spin_id.to_string();

        let model = spin_history::ActiveModel {
            id: ActiveValue::NotSet,
            spin_id: ActiveValue::Set(spin_id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            result_type: ActiveValue::Set(ResultType::from(outcome).as_str().to_string()),
            amount: ActiveValue::Set(outcome.amount),
            segment_name: ActiveValue::Set(outcome.label.clone()),
            points_earned: ActiveValue::Set(outcome.points),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        SpinHistory::insert(model)
            .on_conflict(
                OnConflict::column(spin_history::Column::SpinId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        let saved = SpinHistory::find()
            .filter(spin_history::Column::SpinId.eq(spin_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve recorded spin"))?;

        Self::model_to_entry(saved)
    }

    /// Most recent entries for a user, newest first
    pub async fn recent(&self, user_id: &str, limit: u64) -> Result<Vec<SpinHistoryEntry>> {
        SpinHistory::find()
            .filter(spin_history::Column::UserId.eq(user_id))
            .order_by_desc(spin_history::Column::CreatedAt)
            .order_by_desc(spin_history::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_entry)
            .collect()
    }
}
