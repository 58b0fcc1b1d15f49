//! Guild settings factory for creating per-guild configuration rows.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild settings with customizable fields.
///
/// Defaults: economy and levels enabled, no banner style, no report or
/// log channels, empty permission overrides.
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: i64,
    economy_on: bool,
    levels_on: bool,
    banner_style: Option<String>,
}

impl<'a> GuildSettingsFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: i64) -> Self {
        Self {
            db,
            guild_id,
            economy_on: true,
            levels_on: true,
            banner_style: None,
        }
    }

    pub fn economy_on(mut self, on: bool) -> Self {
        self.economy_on = on;
        self
    }

    pub fn levels_on(mut self, on: bool) -> Self {
        self.levels_on = on;
        self
    }

    pub fn banner_style(mut self, style: Option<&str>) -> Self {
        self.banner_style = style.map(|s| s.to_string());
        self
    }

    /// Builds and inserts the guild settings row.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created settings row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            economy_on: ActiveValue::Set(self.economy_on),
            levels_on: ActiveValue::Set(self.levels_on),
            banner_style: ActiveValue::Set(self.banner_style),
            reports_channel_id: ActiveValue::Set(None),
            logs_channel_id: ActiveValue::Set(None),
            permissions_overrides: ActiveValue::Set(serde_json::json!({})),
            level_up_embed: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild settings with default values.
///
/// Shorthand for `GuildSettingsFactory::new(db, guild_id).build().await`.
pub async fn create_settings(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db, guild_id).build().await
}
