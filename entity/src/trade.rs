use sea_orm::entity::prelude::*;

/// A two-party card trade offer.
///
/// `state` is one of `"open"`, `"accepted"`, `"declined"`,
/// `"expired"`. For any card uid at most one trade row referencing it
/// may be in state `"open"`; the trade service re-checks this on every
/// transition.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trade")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub offerer_uid: i64,
    pub offeree_uid: i64,
    pub offerer_user_id: i64,
    pub offeree_user_id: i64,
    pub state: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
