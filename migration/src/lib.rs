pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_stats_table;
mod m20240101_000002_create_spin_history_table;
mod m20240101_000003_create_notification_tables;
mod m20240101_000004_create_applied_spins_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_stats_table::Migration),
            Box::new(m20240101_000002_create_spin_history_table::Migration),
            Box::new(m20240101_000003_create_notification_tables::Migration),
            Box::new(m20240101_000004_create_applied_spins_table::Migration),
        ]
    }
}
