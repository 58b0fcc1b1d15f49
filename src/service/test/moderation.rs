use chrono::Duration;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

use crate::data::moderation::{punishment, ModerationStatRepository, WarnRepository};
use crate::service::moderation::ModerationService;

/// Full warn cycle: add, list, remove, and check both stat counters.
#[tokio::test]
async fn warn_cycle_updates_stats() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = ModerationService::new(db);
    let warn = service.add_warn(1, 2, 3, "spam").await.unwrap();
    assert_eq!(warn.case_number, 1);

    let warns = WarnRepository::new(db);
    assert_eq!(warns.list_for_user(1, 2).await?.len(), 1);

    assert!(service.remove_warn(1, warn.case_number).await.unwrap());
    assert!(warns.list_for_user(1, 2).await?.is_empty());

    // Removal keeps the counters: the punishment happened.
    let stats = ModerationStatRepository::new(db);
    let target = stats.stats_for(1, 2).await?;
    assert_eq!(target[0].punishment_kind, punishment::WARN);
    assert_eq!(target[0].received_count, 1);

    let moderator = stats.stats_for(1, 3).await?;
    assert_eq!(moderator[0].given_count, 1);

    Ok(())
}

#[tokio::test]
async fn consecutive_warns_get_consecutive_cases() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = ModerationService::new(db);
    let a = service.add_warn(1, 2, 3, "one").await.unwrap();
    let b = service.add_warn(1, 2, 3, "two").await.unwrap();
    let c = service.add_warn(1, 4, 3, "three").await.unwrap();

    assert_eq!((a.case_number, b.case_number, c.case_number), (1, 2, 3));

    Ok(())
}

#[tokio::test]
async fn timed_ban_sets_expiry_and_counters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = ModerationService::new(db);
    let ban = service
        .add_ban(1, 2, 3, "rule violation", Some(Duration::hours(1)))
        .await
        .unwrap();
    assert!(ban.unban_at.is_some());

    let permanent = service.add_ban(1, 4, 3, "worse", None).await.unwrap();
    assert!(permanent.unban_at.is_none());

    let stats = ModerationStatRepository::new(db);
    let moderator = stats.stats_for(1, 3).await?;
    let bans = moderator.iter().find(|s| s.punishment_kind == punishment::BAN).unwrap();
    assert_eq!(bans.given_count, 2);

    Ok(())
}

/// Reaper-side half of the ban lifecycle: pick up due records, purge.
#[tokio::test]
async fn expired_ban_is_purged_once_handled() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_moderation_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = ModerationService::new(db);
    service
        .add_ban(1, 2, 3, "short", Some(Duration::seconds(-1)))
        .await
        .unwrap();

    let now = chrono::Utc::now();
    let due = service.due_bans(now).await.unwrap();
    assert_eq!(due.len(), 1);

    service.purge_ban(due[0].id).await.unwrap();
    assert!(service.due_bans(now).await.unwrap().is_empty());

    Ok(())
}
