use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::{AppError, DomainError};
use crate::service::banner;

pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets the banner style, guarding on the boost count.
    pub async fn set_banner_style(
        &self,
        guild_id: i64,
        style: &str,
        premium_subscription_count: u64,
    ) -> Result<(), AppError> {
        banner::ensure_boosts(premium_subscription_count)?;
        if !banner::is_known_style(style) {
            return Err(AppError::InternalError(format!("unknown banner style {style}")));
        }

        GuildSettingsRepository::new(self.db)
            .set_banner_style(guild_id, Some(style))
            .await?;
        Ok(())
    }

    /// Clears the banner style, removing the guild from rotation.
    ///
    /// Same boost guard as [`set_banner_style`](Self::set_banner_style);
    /// guilds below the threshold are cleared by the boost reaper instead.
    pub async fn disable_banner(
        &self,
        guild_id: i64,
        premium_subscription_count: u64,
    ) -> Result<(), AppError> {
        banner::ensure_boosts(premium_subscription_count)?;
        GuildSettingsRepository::new(self.db)
            .set_banner_style(guild_id, None)
            .await?;
        Ok(())
    }

    /// Checks a per-command role override against the caller's roles.
    ///
    /// No override configured means the command's default permission check
    /// applies and this returns `Ok`.
    pub async fn check_command_roles(
        &self,
        guild_id: i64,
        command: &str,
        caller_roles: &[u64],
    ) -> Result<(), AppError> {
        let Some(required) = GuildSettingsRepository::new(self.db)
            .allowed_roles(guild_id, command)
            .await?
        else {
            return Ok(());
        };

        if required.iter().any(|r| caller_roles.contains(r)) {
            return Ok(());
        }

        Err(DomainError::DoesntHaveAgreedRole { required_roles: required }.into())
    }

    /// Deletes every persistent row belonging to the guild.
    ///
    /// Runs in one transaction; the wipe modal has already verified the
    /// confirmation phrase before this is called. Card instances are
    /// member-owned and cross-guild, so they survive.
    pub async fn wipe_guild_data(&self, guild_id: i64) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        entity::prelude::GuildSettings::delete_many()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::GlobalBan::delete_many()
            .filter(entity::global_ban::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Warn::delete_many()
            .filter(entity::warn::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::ModerationStat::delete_many()
            .filter(entity::moderation_stat::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Balance::delete_many()
            .filter(entity::balance::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Transaction::delete_many()
            .filter(entity::transaction::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::InGame::delete_many()
            .filter(entity::in_game::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Level::delete_many()
            .filter(entity::level::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Trade::delete_many()
            .filter(entity::trade::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;
        entity::prelude::Pet::delete_many()
            .filter(entity::pet::Column::GuildId.eq(guild_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }
}
