use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::{notification_history, notification_tokens, prelude::*};
use spin_types::NotificationToken;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationHistoryRecord {
    pub total_sent: i32,
    pub total_failed: i32,
    pub message: String,
    pub results: serde_json::Value,
    pub created_at: String,
}

/// Push tokens and the audit log of dispatch runs
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_token(model: notification_tokens::Model) -> NotificationToken {
        NotificationToken {
            user_id: model.user_id,
            fid: model.fid,
            notification_url: model.notification_url,
            notification_token: model.notification_token,
            is_active: model.is_active,
        }
    }

    pub async fn active_tokens(&self) -> Result<Vec<NotificationToken>> {
        let tokens = NotificationTokens::find()
            .filter(notification_tokens::Column::IsActive.eq(true))
            .order_by_asc(notification_tokens::Column::Id)
            .all(&self.db)
            .await?;

        Ok(tokens.into_iter().map(Self::model_to_token).collect())
    }

    /// Store a token, or refresh the endpoint and owner of a known one
    pub async fn save_token(&self, token: &NotificationToken) -> Result<()> {
        let model = notification_tokens::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(token.user_id.clone()),
            fid: ActiveValue::Set(token.fid),
            notification_url: ActiveValue::Set(token.notification_url.clone()),
            notification_token: ActiveValue::Set(token.notification_token.clone()),
            is_active: ActiveValue::Set(token.is_active),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        NotificationTokens::insert(model)
            .on_conflict(
                OnConflict::column(notification_tokens::Column::NotificationToken)
                    .update_columns([
                        notification_tokens::Column::UserId,
                        notification_tokens::Column::Fid,
                        notification_tokens::Column::NotificationUrl,
                        notification_tokens::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Mark tokens as inactive, returning how many rows changed
    pub async fn deactivate_tokens(&self, tokens: &[String]) -> Result<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let result = NotificationTokens::update_many()
            .col_expr(notification_tokens::Column::IsActive, Expr::value(false))
            .filter(notification_tokens::Column::NotificationToken.is_in(tokens.iter().cloned()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn record_history(
        &self,
        total_sent: i32,
        total_failed: i32,
        message: &str,
        results: serde_json::Value,
    ) -> Result<()> {
        let model = notification_history::ActiveModel {
            id: ActiveValue::NotSet,
            total_sent: ActiveValue::Set(total_sent),
            total_failed: ActiveValue::Set(total_failed),
            message: ActiveValue::Set(message.to_string()),
            results: ActiveValue::Set(results),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        NotificationHistory::insert(model)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn recent_history(&self, limit: u64) -> Result<Vec<NotificationHistoryRecord>> {
        let rows = NotificationHistory::find()
            .order_by_desc(notification_history::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|model| NotificationHistoryRecord {
                total_sent: model.total_sent,
                total_failed: model.total_failed,
                message: model.message,
                results: model.results,
                created_at: model.created_at.to_rfc3339(),
            })
            .collect())
    }
}
