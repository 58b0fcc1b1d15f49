pub mod balance;
pub mod card_instance;
pub mod global_ban;
pub mod guild_settings;
pub mod in_game;
pub mod level;
pub mod moderation_stat;
pub mod pet;
pub mod trade;
pub mod transaction;
pub mod warn;

pub mod prelude {
    pub use super::balance::Entity as Balance;
    pub use super::card_instance::Entity as CardInstance;
    pub use super::global_ban::Entity as GlobalBan;
    pub use super::guild_settings::Entity as GuildSettings;
    pub use super::in_game::Entity as InGame;
    pub use super::level::Entity as Level;
    pub use super::moderation_stat::Entity as ModerationStat;
    pub use super::pet::Entity as Pet;
    pub use super::trade::Entity as Trade;
    pub use super::transaction::Entity as Transaction;
    pub use super::warn::Entity as Warn;
}
