use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationStat::Table)
                    .if_not_exists()
                    .col(pk_auto(ModerationStat::Id))
                    .col(big_integer(ModerationStat::GuildId))
                    .col(big_integer(ModerationStat::UserId))
                    .col(string(ModerationStat::PunishmentKind))
                    .col(integer(ModerationStat::GivenCount))
                    .col(integer(ModerationStat::ReceivedCount))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationStat::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum ModerationStat {
    Table,
    Id,
    GuildId,
    UserId,
    PunishmentKind,
    GivenCount,
    ReceivedCount,
}
