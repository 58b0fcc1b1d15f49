use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlobalBan::Table)
                    .if_not_exists()
                    .col(pk_auto(GlobalBan::Id))
                    .col(big_integer(GlobalBan::GuildId))
                    .col(big_integer(GlobalBan::UserId))
                    .col(big_integer(GlobalBan::ModeratorId))
                    .col(string(GlobalBan::Reason))
                    .col(timestamp_with_time_zone_null(GlobalBan::UnbanAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GlobalBan::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum GlobalBan {
    Table,
    Id,
    GuildId,
    UserId,
    ModeratorId,
    Reason,
    UnbanAt,
}
