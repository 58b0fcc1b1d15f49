use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(GuildSettings::Id))
                    .col(big_integer_uniq(GuildSettings::GuildId))
                    .col(boolean(GuildSettings::EconomyOn))
                    .col(boolean(GuildSettings::LevelsOn))
                    .col(string_null(GuildSettings::BannerStyle))
                    .col(big_integer_null(GuildSettings::ReportsChannelId))
                    .col(big_integer_null(GuildSettings::LogsChannelId))
                    .col(json(GuildSettings::PermissionsOverrides))
                    .col(json_null(GuildSettings::LevelUpEmbed))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum GuildSettings {
    Table,
    Id,
    GuildId,
    EconomyOn,
    LevelsOn,
    BannerStyle,
    ReportsChannelId,
    LogsChannelId,
    PermissionsOverrides,
    LevelUpEmbed,
}
