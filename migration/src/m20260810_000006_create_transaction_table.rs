use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(pk_auto(Transaction::Id))
                    .col(big_integer(Transaction::GuildId))
                    .col(big_integer(Transaction::UserId))
                    .col(big_integer(Transaction::Amount))
                    .col(string(Transaction::Kind))
                    .col(string(Transaction::LocaleKey))
                    .col(timestamp_with_time_zone(Transaction::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Transaction {
    Table,
    Id,
    GuildId,
    UserId,
    Amount,
    Kind,
    LocaleKey,
    CreatedAt,
}
