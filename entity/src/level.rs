use sea_orm::entity::prelude::*;

/// Leveling state for one member in one guild.
///
/// Invariants maintained by the leveling service:
/// `0 <= exp_now < exp_need` except in the prestige-eligible state
/// (`level == 100 && exp_now == exp_need`), `level` in 1..=100,
/// `prestige` in 0..=10.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "level")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub prestige: i32,
    pub level: i32,
    pub exp_need: i64,
    pub exp_now: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
