pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_guild_settings_table;
mod m20260810_000002_create_global_ban_table;
mod m20260810_000003_create_warn_table;
mod m20260810_000004_create_moderation_stat_table;
mod m20260810_000005_create_balance_table;
mod m20260810_000006_create_transaction_table;
mod m20260810_000007_create_in_game_table;
mod m20260810_000008_create_level_table;
mod m20260811_000009_create_card_instance_table;
mod m20260811_000010_create_trade_table;
mod m20260811_000011_create_pet_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_guild_settings_table::Migration),
            Box::new(m20260810_000002_create_global_ban_table::Migration),
            Box::new(m20260810_000003_create_warn_table::Migration),
            Box::new(m20260810_000004_create_moderation_stat_table::Migration),
            Box::new(m20260810_000005_create_balance_table::Migration),
            Box::new(m20260810_000006_create_transaction_table::Migration),
            Box::new(m20260810_000007_create_in_game_table::Migration),
            Box::new(m20260810_000008_create_level_table::Migration),
            Box::new(m20260811_000009_create_card_instance_table::Migration),
            Box::new(m20260811_000010_create_trade_table::Migration),
            Box::new(m20260811_000011_create_pet_table::Migration),
        ]
    }
}
