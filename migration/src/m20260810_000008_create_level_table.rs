use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Level::Table)
                    .if_not_exists()
                    .col(pk_auto(Level::Id))
                    .col(big_integer(Level::GuildId))
                    .col(big_integer(Level::UserId))
                    .col(integer(Level::Prestige))
                    .col(integer(Level::Level))
                    .col(big_integer(Level::ExpNeed))
                    .col(big_integer(Level::ExpNow))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Level::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Level {
    Table,
    Id,
    GuildId,
    UserId,
    Prestige,
    Level,
    ExpNeed,
    ExpNow,
}
