use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warn::Table)
                    .if_not_exists()
                    .col(pk_auto(Warn::Id))
                    .col(integer(Warn::CaseNumber))
                    .col(big_integer(Warn::GuildId))
                    .col(big_integer(Warn::UserId))
                    .col(big_integer(Warn::ModeratorId))
                    .col(string(Warn::Reason))
                    .col(timestamp_with_time_zone(Warn::IssuedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warn::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Warn {
    Table,
    Id,
    CaseNumber,
    GuildId,
    UserId,
    ModeratorId,
    Reason,
    IssuedAt,
}
