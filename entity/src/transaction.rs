use sea_orm::entity::prelude::*;

/// Append-only transaction log row.
///
/// `kind` is `"incoming"` or `"outgoing"`; `locale_key` points at the
/// localized description template shown in the transactions list.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub kind: String,
    pub locale_key: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
