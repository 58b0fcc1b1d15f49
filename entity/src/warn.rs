use sea_orm::entity::prelude::*;

/// A moderation warning. `case_number` is guild-scoped and
/// monotonically increasing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "warn")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub case_number: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub moderator_id: i64,
    pub reason: String,
    pub issued_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
