use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardInstance::Table)
                    .if_not_exists()
                    .col(pk_auto(CardInstance::Id))
                    .col(big_integer_uniq(CardInstance::Uid))
                    .col(integer(CardInstance::CardId))
                    .col(big_integer(CardInstance::OwnerUserId))
                    .col(string(CardInstance::Rarity))
                    .col(integer(CardInstance::StarsCount))
                    .col(timestamp_with_time_zone(CardInstance::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CardInstance::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum CardInstance {
    Table,
    Id,
    Uid,
    CardId,
    OwnerUserId,
    Rarity,
    StarsCount,
    CreatedAt,
}
