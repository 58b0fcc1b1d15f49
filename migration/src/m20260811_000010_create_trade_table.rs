use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trade::Table)
                    .if_not_exists()
                    .col(pk_auto(Trade::Id))
                    .col(big_integer(Trade::GuildId))
                    .col(big_integer(Trade::OffererUid))
                    .col(big_integer(Trade::OffereeUid))
                    .col(big_integer(Trade::OffererUserId))
                    .col(big_integer(Trade::OffereeUserId))
                    .col(string(Trade::State))
                    .col(timestamp_with_time_zone(Trade::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trade::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Trade {
    Table,
    Id,
    GuildId,
    OffererUid,
    OffereeUid,
    OffererUserId,
    OffereeUserId,
    State,
    CreatedAt,
}
