use sea_orm::entity::prelude::*;

/// An owned copy of a catalog card.
///
/// `uid` is the globally unique instance id shown to users; `card_id`
/// points into the static card catalog.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "card_instance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uid: i64,
    pub card_id: i32,
    pub owner_user_id: i64,
    pub rarity: String,
    pub stars_count: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
