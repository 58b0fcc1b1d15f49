use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::warn::WarnFactory};

use crate::data::moderation::{
    punishment, GlobalBanRepository, ModerationStatRepository, WarnRepository,
};

#[tokio::test]
async fn case_numbers_stay_monotonic_after_removal() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnRepository::new(db);

    let first = repo.next_case_number(1).await?;
    repo.insert(first, 1, 2, 3, "spam").await?;
    let second = repo.next_case_number(1).await?;
    repo.insert(second, 1, 2, 3, "spam again").await?;

    assert!(repo.remove_by_case(1, second).await?);

    // The removed maximum must never be reissued.
    assert_eq!(repo.next_case_number(1).await?, second + 1);

    Ok(())
}

#[tokio::test]
async fn case_numbers_are_guild_scoped() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WarnFactory::new(db).guild_id(1).case_number(5).build().await?;

    let repo = WarnRepository::new(db);
    assert_eq!(repo.next_case_number(1).await?, 6);
    assert_eq!(repo.next_case_number(2).await?, 1);

    Ok(())
}

#[tokio::test]
async fn remove_by_case_reports_missing_warns() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarnRepository::new(db);
    assert!(!repo.remove_by_case(1, 42).await?);

    Ok(())
}

#[tokio::test]
async fn due_skips_permanent_and_future_bans() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let expired = factory::create_ban(db, 1, 2, Some(now - Duration::minutes(5))).await?;
    factory::create_ban(db, 1, 3, Some(now + Duration::hours(1))).await?;
    factory::create_ban(db, 1, 4, None).await?;

    let repo = GlobalBanRepository::new(db);
    let due = repo.due(now).await?;

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, expired.id);

    Ok(())
}

#[tokio::test]
async fn due_ban_disappears_after_delete() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let ban = factory::create_ban(db, 1, 2, Some(now - Duration::minutes(1))).await?;

    let repo = GlobalBanRepository::new(db);
    repo.delete(ban.id).await?;

    assert!(repo.due(now).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn stat_counters_split_given_and_received() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ModerationStatRepository::new(db);
    repo.increment_given(1, 3, punishment::WARN).await?;
    repo.increment_given(1, 3, punishment::WARN).await?;
    repo.increment_received(1, 3, punishment::BAN).await?;

    let stats = repo.stats_for(1, 3).await?;
    assert_eq!(stats.len(), 2);

    let warns = stats.iter().find(|s| s.punishment_kind == punishment::WARN).unwrap();
    assert_eq!(warns.given_count, 2);
    assert_eq!(warns.received_count, 0);

    let bans = stats.iter().find(|s| s.punishment_kind == punishment::BAN).unwrap();
    assert_eq!(bans.received_count, 1);

    Ok(())
}
