use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per spin id whose increment has been applied
        manager
            .create_table(
                Table::create()
                    .table(AppliedSpins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppliedSpins::SpinId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AppliedSpins::UserId).string().not_null())
                    .col(
                        ColumnDef::new(AppliedSpins::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppliedSpins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AppliedSpins {
    Table,
    SpinId,
    UserId,
    AppliedAt,
}
