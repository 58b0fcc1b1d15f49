use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Balance::Table)
                    .if_not_exists()
                    .col(pk_auto(Balance::Id))
                    .col(big_integer(Balance::GuildId))
                    .col(big_integer(Balance::UserId))
                    .col(big_integer(Balance::Amount))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Balance::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Balance {
    Table,
    Id,
    GuildId,
    UserId,
    Amount,
}
