use sea_orm::entity::prelude::*;

/// Per-guild module configuration.
///
/// One row per guild the bot has seen. `banner_style` is only ever
/// non-null while the guild's boost count exceeds the premium
/// threshold; the boost reaper clears it otherwise.
/// `permissions_overrides` maps command names to allowed role id lists.
/// `level_up_embed` holds the admin-configured announcement form, null
/// when the templated announcement is used.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub guild_id: i64,
    pub economy_on: bool,
    pub levels_on: bool,
    pub banner_style: Option<String>,
    pub reports_channel_id: Option<i64>,
    pub logs_channel_id: Option<i64>,
    pub permissions_overrides: Json,
    pub level_up_embed: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
