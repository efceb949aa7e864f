use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SpinHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SpinHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SpinHistory::SpinId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SpinHistory::UserId).string().not_null())
                    .col(ColumnDef::new(SpinHistory::ResultType).string().not_null())
                    .col(
                        ColumnDef::new(SpinHistory::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SpinHistory::SegmentName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(SpinHistory::PointsEarned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SpinHistory::CreatedAt)
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
                    .name("idx_spin_history_user_id")
                    .table(SpinHistory::Table)
                    .col(SpinHistory::UserId)
                    .col(SpinHistory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SpinHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SpinHistory {
    Table,
    Id,
    SpinId,
    UserId,
    ResultType,
    Amount,
    SegmentName,
    PointsEarned,
    CreatedAt,
}
