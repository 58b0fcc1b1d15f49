use sea_orm::entity::prelude::*;

/// Aggregated punishment counters per guild member.
///
/// `punishment_kind` is one of `"warn"`, `"ban"`, `"timeout"`.
/// `given_count` counts punishments issued as a moderator,
/// `received_count` punishments received as a target.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "moderation_stat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub punishment_kind: String,
    pub given_count: i32,
    pub received_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
