use entity::prelude::GuildSettings;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::guild_settings::GuildSettingsFactory};

use crate::data::guild_settings::GuildSettingsRepository;

#[tokio::test]
async fn get_or_create_defaults_modules_on() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.get_or_create(1).await?;

    assert!(settings.economy_on);
    assert!(settings.levels_on);
    assert!(settings.banner_style.is_none());

    // Second call returns the same row.
    assert_eq!(repo.get_or_create(1).await?.id, settings.id);

    Ok(())
}

#[tokio::test]
async fn with_banner_style_lists_configured_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    GuildSettingsFactory::new(db, 1).banner_style(Some("neon")).build().await?;
    GuildSettingsFactory::new(db, 2).build().await?;

    let repo = GuildSettingsRepository::new(db);
    let configured = repo.with_banner_style().await?;

    assert_eq!(configured.len(), 1);
    assert_eq!(configured[0].guild_id, 1);

    Ok(())
}

#[tokio::test]
async fn clearing_banner_style_removes_guild_from_rotation() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.set_banner_style(1, Some("neon")).await?;
    repo.set_banner_style(1, None).await?;

    assert!(repo.with_banner_style().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn permission_override_roundtrip() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(GuildSettings).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.set_permission_override(1, "warn", &[10, 20]).await?;

    assert_eq!(repo.allowed_roles(1, "warn").await?, Some(vec![10, 20]));
    assert_eq!(repo.allowed_roles(1, "ban").await?, None);

    // Empty role list removes the override.
    repo.set_permission_override(1, "warn", &[]).await?;
    assert_eq!(repo.allowed_roles(1, "warn").await?, None);

    Ok(())
}
