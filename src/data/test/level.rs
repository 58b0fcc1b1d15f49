use entity::prelude::Level;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::level::LevelFactory};

use crate::data::level::{LevelRepository, BASE_EXP_NEED};

#[tokio::test]
async fn first_message_creates_level_one() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = LevelRepository::new(db);
    let row = repo.get_or_create(1, 2).await?;

    assert_eq!(row.level, 1);
    assert_eq!(row.prestige, 0);
    assert_eq!(row.exp_now, 0);
    assert_eq!(row.exp_need, BASE_EXP_NEED);

    Ok(())
}

#[tokio::test]
async fn save_progress_updates_in_place() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Level).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let seeded = LevelFactory::new(db).guild_id(1).user_id(2).exp(90, 100).build().await?;

    let repo = LevelRepository::new(db);
    repo.save_progress(seeded, 0, 2, 150, 5).await?;

    let row = repo.find(1, 2).await?.unwrap();
    assert_eq!(row.level, 2);
    assert_eq!(row.exp_need, 150);
    assert_eq!(row.exp_now, 5);

    Ok(())
}
