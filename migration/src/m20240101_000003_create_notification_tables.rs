use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::Fid)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::NotificationUrl)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::NotificationToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_tokens_is_active")
                    .table(NotificationTokens::Table)
                    .col(NotificationTokens::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NotificationHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationHistory::TotalSent)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NotificationHistory::TotalFailed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NotificationHistory::Message)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationHistory::Results).json().not_null())
                    .col(
                        ColumnDef::new(NotificationHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NotificationTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NotificationTokens {
    Table,
    Id,
    UserId,
    Fid,
    NotificationUrl,
    NotificationToken,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NotificationHistory {
    Table,
    Id,
    TotalSent,
    TotalFailed,
    Message,
    Results,
    CreatedAt,
}
