use entity::prelude::Level;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::level::LevelFactory};

use crate::data::level::LevelRepository;
use crate::service::leveling::{LevelingService, MAX_LEVEL};

#[tokio::test]
async fn plain_accrual_reports_no_level_up() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = LevelingService::new(db);
    let outcome = service.apply_message_exp(1, 2, 10).await.unwrap();
    assert!(outcome.is_none());

    let row = LevelRepository::new(db).find(1, 2).await?.unwrap();
    assert_eq!(row.level, 1);
    assert_eq!(row.exp_now, 10);

    Ok(())
}

#[tokio::test]
async fn crossing_the_threshold_levels_up_with_carry() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    LevelFactory::new(db).guild_id(1).user_id(2).exp(95, 100).build().await?;

    let service = LevelingService::new(db);
    let up = service.apply_message_exp(1, 2, 10).await.unwrap().unwrap();

    assert_eq!(up.last_level, 1);
    assert_eq!(up.level, 2);
    assert_eq!(up.exp_now, 5);
    assert_eq!(up.exp_need, 150);
    assert!(!up.can_prestige);

    Ok(())
}

#[tokio::test]
async fn level_caps_at_one_hundred() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    LevelFactory::new(db)
        .guild_id(1)
        .user_id(2)
        .level(MAX_LEVEL)
        .exp(0, 5050)
        .build()
        .await?;

    let service = LevelingService::new(db);
    let outcome = service.apply_message_exp(1, 2, 1_000_000).await.unwrap();
    assert!(outcome.is_none());

    let row = LevelRepository::new(db).find(1, 2).await?.unwrap();
    assert_eq!(row.level, MAX_LEVEL);
    // Saturated at the requirement: the prestige-eligible state.
    assert_eq!(row.exp_now, row.exp_need);

    Ok(())
}

#[tokio::test]
async fn prestige_resets_rank_and_increments() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    LevelFactory::new(db)
        .guild_id(1)
        .user_id(2)
        .level(MAX_LEVEL)
        .exp(5050, 5050)
        .build()
        .await?;

    let service = LevelingService::new(db);
    let upgraded = service.prestige(1, 2).await.unwrap().unwrap();

    assert_eq!(upgraded.prestige, 1);
    assert_eq!(upgraded.level, 1);
    assert_eq!(upgraded.exp_now, 0);

    Ok(())
}

#[tokio::test]
async fn prestige_refuses_ineligible_members() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    LevelFactory::new(db).guild_id(1).user_id(2).level(50).exp(10, 100).build().await?;

    let service = LevelingService::new(db);
    assert!(service.prestige(1, 2).await.unwrap().is_none());

    // Untouched member rows also refuse.
    assert!(service.prestige(1, 3).await.unwrap().is_none());

    Ok(())
}
