use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InGame::Table)
                    .if_not_exists()
                    .col(pk_auto(InGame::Id))
                    .col(big_integer(InGame::GuildId))
                    .col(big_integer(InGame::UserId))
                    .col(boolean(InGame::Active))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InGame::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum InGame {
    Table,
    Id,
    GuildId,
    UserId,
    Active,
}
