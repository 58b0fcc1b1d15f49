use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct GuildSettingsRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GuildSettingsRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, guild_id: i64) -> Result<Option<entity::guild_settings::Model>, DbErr> {
        entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id))
            .one(self.db)
            .await
    }

    /// Fetches the settings row for a guild, creating the default row
    /// (economy and levels enabled, no banner style) on first contact.
    pub async fn get_or_create(
        &self,
        guild_id: i64,
    ) -> Result<entity::guild_settings::Model, DbErr> {
        if let Some(existing) = self.find(guild_id).await? {
            return Ok(existing);
        }

        entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(guild_id),
            economy_on: ActiveValue::Set(true),
            levels_on: ActiveValue::Set(true),
            banner_style: ActiveValue::Set(None),
            reports_channel_id: ActiveValue::Set(None),
            logs_channel_id: ActiveValue::Set(None),
            permissions_overrides: ActiveValue::Set(serde_json::json!({})),
            level_up_embed: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Sets or clears the banner style.
    ///
    /// The boost-count guard lives in the settings service; this method
    /// only persists whatever the guard allowed.
    pub async fn set_banner_style(
        &self,
        guild_id: i64,
        style: Option<&str>,
    ) -> Result<entity::guild_settings::Model, DbErr> {
        let current = self.get_or_create(guild_id).await?;
        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.banner_style = ActiveValue::Set(style.map(|s| s.to_string()));
        active.update(self.db).await
    }

    /// All guilds with a configured banner style. Driven by the banner
    /// minute tick and the boost reaper.
    pub async fn with_banner_style(&self) -> Result<Vec<entity::guild_settings::Model>, DbErr> {
        entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::BannerStyle.is_not_null())
            .all(self.db)
            .await
    }

    pub async fn set_economy(&self, guild_id: i64, on: bool) -> Result<(), DbErr> {
        let current = self.get_or_create(guild_id).await?;
        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.economy_on = ActiveValue::Set(on);
        active.update(self.db).await?;
        Ok(())
    }

    pub async fn set_levels(&self, guild_id: i64, on: bool) -> Result<(), DbErr> {
        let current = self.get_or_create(guild_id).await?;
        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.levels_on = ActiveValue::Set(on);
        active.update(self.db).await?;
        Ok(())
    }

    pub async fn set_channels(
        &self,
        guild_id: i64,
        reports: Option<i64>,
        logs: Option<i64>,
    ) -> Result<(), DbErr> {
        let current = self.get_or_create(guild_id).await?;
        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.reports_channel_id = ActiveValue::Set(reports);
        active.logs_channel_id = ActiveValue::Set(logs);
        active.update(self.db).await?;
        Ok(())
    }

    /// Sets or clears the custom level-up announcement form.
    pub async fn set_level_up_embed(
        &self,
        guild_id: i64,
        form: Option<serde_json::Value>,
    ) -> Result<(), DbErr> {
        let current = self.get_or_create(guild_id).await?;
        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.level_up_embed = ActiveValue::Set(form);
        active.update(self.db).await?;
        Ok(())
    }

    /// Replaces the role allow-list for one command.
    ///
    /// An empty `roles` slice removes the override, restoring the
    /// command's default permission check.
    pub async fn set_permission_override(
        &self,
        guild_id: i64,
        command: &str,
        roles: &[u64],
    ) -> Result<(), DbErr> {
        let current = self.get_or_create(guild_id).await?;

        let mut overrides = current.permissions_overrides.clone();
        let map = overrides
            .as_object_mut()
            .ok_or_else(|| DbErr::Custom("permissions_overrides is not an object".to_string()))?;

        if roles.is_empty() {
            map.remove(command);
        } else {
            map.insert(
                command.to_string(),
                serde_json::Value::from(roles.iter().map(|r| *r as i64).collect::<Vec<_>>()),
            );
        }

        let mut active: entity::guild_settings::ActiveModel = current.into();
        active.permissions_overrides = ActiveValue::Set(overrides);
        active.update(self.db).await?;
        Ok(())
    }

    /// Role allow-list configured for a command, if any.
    pub async fn allowed_roles(
        &self,
        guild_id: i64,
        command: &str,
    ) -> Result<Option<Vec<u64>>, DbErr> {
        let Some(settings) = self.find(guild_id).await? else {
            return Ok(None);
        };

        let roles = settings
            .permissions_overrides
            .get(command)
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).map(|v| v as u64).collect());

        Ok(roles)
    }
}
