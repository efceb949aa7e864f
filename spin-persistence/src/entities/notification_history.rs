use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub total_sent: i32,
    pub total_failed: i32,
    pub message: String,
    pub results: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
