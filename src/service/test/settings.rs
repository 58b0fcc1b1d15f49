use entity::prelude::*;
use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory, factory::warn::WarnFactory};

use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::DomainError;
use crate::service::settings::SettingsService;

#[tokio::test]
async fn banner_style_needs_enough_boosts() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = SettingsService::new(db);

    let err = service.set_banner_style(1, "green", 6).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotEnoughBoosts { .. })));

    service.set_banner_style(1, "green", 7).await.unwrap();
    let settings = GuildSettingsRepository::new(db).find(1).await?.unwrap();
    assert_eq!(settings.banner_style.as_deref(), Some("green"));

    service.disable_banner(1, 7).await.unwrap();
    let settings = GuildSettingsRepository::new(db).find(1).await?.unwrap();
    assert!(settings.banner_style.is_none());

    Ok(())
}

#[tokio::test]
async fn disable_banner_needs_enough_boosts() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = SettingsService::new(db);
    service.set_banner_style(1, "pink", 8).await.unwrap();

    let err = service.disable_banner(1, 6).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotEnoughBoosts { .. })));

    // The style is untouched until the boost reaper clears it.
    let settings = GuildSettingsRepository::new(db).find(1).await?.unwrap();
    assert_eq!(settings.banner_style.as_deref(), Some("pink"));

    Ok(())
}

#[tokio::test]
async fn role_override_gates_the_command() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    GuildSettingsRepository::new(db)
        .set_permission_override(1, "warn", &[10, 20])
        .await?;

    let service = SettingsService::new(db);

    // Caller holds one of the listed roles.
    service.check_command_roles(1, "warn", &[20, 99]).await.unwrap();

    // Caller holds none of them.
    let err = service.check_command_roles(1, "warn", &[99]).await.unwrap_err();
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::DoesntHaveAgreedRole { required_roles: vec![10, 20] })
    );

    // No override configured: default permission check applies.
    service.check_command_roles(1, "ban", &[]).await.unwrap();

    Ok(())
}

#[tokio::test]
async fn wipe_removes_guild_rows_and_spares_cards() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .with_economy_tables()
        .with_moderation_tables()
        .with_table(CardInstance)
        .with_table(Trade)
        .with_table(Level)
        .with_table(Pet)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_settings(db, 1).await?;
    factory::create_balance(db, 1, 2, 100).await?;
    WarnFactory::new(db).guild_id(1).build().await?;
    let card = factory::create_card(db, 2).await?;
    factory::create_open_trade(db, 1, (2, card.uid), (3, 999)).await?;

    // A second guild that must survive the wipe.
    factory::create_balance(db, 2, 2, 50).await?;

    SettingsService::new(db).wipe_guild_data(1).await.unwrap();

    assert!(GuildSettings::find().all(db).await?.is_empty());
    assert!(Warn::find().all(db).await?.is_empty());
    assert!(Trade::find().all(db).await?.is_empty());

    let balances = Balance::find().all(db).await?;
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].guild_id, 2);

    // Cards are member-owned, not guild state.
    assert_eq!(CardInstance::find().all(db).await?.len(), 1);

    Ok(())
}
