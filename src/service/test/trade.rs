use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::card_instance::CardInstanceFactory};

use crate::data::cards::{trade_state, CardInstanceRepository, TradeRepository};
use crate::data::economy::InGameRepository;
use crate::error::DomainError;
use crate::service::trade::TradeService;

#[tokio::test]
async fn second_offer_for_locked_card_is_rejected() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    // Alice's X, Bob's Y, Charlie's Z.
    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;
    CardInstanceFactory::new(db).uid(300).owner(3).build().await?;

    let service = TradeService::new(db);
    let first = service.open(1, 1, 100, 2, 200).await.unwrap();

    let err = service.open(1, 3, 300, 1, 100).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::AlreadyInTrade { uid: 100 }));

    // The first trade is untouched.
    let reloaded = TradeRepository::new(db).find(first.id).await?.unwrap();
    assert_eq!(reloaded.state, trade_state::OPEN);

    Ok(())
}

#[tokio::test]
async fn accept_swaps_both_owners_and_closes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);
    let trade = service.open(1, 1, 100, 2, 200).await.unwrap();
    let closed = service.accept(trade.id).await.unwrap();
    assert_eq!(closed.state, trade_state::ACCEPTED);

    let cards = CardInstanceRepository::new(db);
    assert_eq!(cards.find_by_uid(100).await?.unwrap().owner_user_id, 2);
    assert_eq!(cards.find_by_uid(200).await?.unwrap().owner_user_id, 1);

    // A closed trade releases the lock for both uids.
    let trades = TradeRepository::new(db);
    assert!(trades.open_trade_for_uid(100).await?.is_none());
    assert!(trades.open_trade_for_uid(200).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn accept_after_ownership_drift_leaves_both_cards() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);
    let trade = service.open(1, 1, 100, 2, 200).await.unwrap();

    // The offerer's card changed hands behind the open offer.
    let cards = CardInstanceRepository::new(db);
    cards.set_owner(100, 9).await?;

    let err = service.accept(trade.id).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::CardNotInTrade { uid: 100 }));

    assert_eq!(cards.find_by_uid(100).await?.unwrap().owner_user_id, 9);
    assert_eq!(cards.find_by_uid(200).await?.unwrap().owner_user_id, 2);

    Ok(())
}

#[tokio::test]
async fn decline_closes_without_ownership_change() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);
    let trade = service.open(1, 1, 100, 2, 200).await.unwrap();
    let closed = service.decline(trade.id).await.unwrap();
    assert_eq!(closed.state, trade_state::DECLINED);

    let cards = CardInstanceRepository::new(db);
    assert_eq!(cards.find_by_uid(100).await?.unwrap().owner_user_id, 1);
    assert_eq!(cards.find_by_uid(200).await?.unwrap().owner_user_id, 2);

    // Terminal trades cannot be accepted afterwards.
    assert!(service.accept(trade.id).await.is_err());

    Ok(())
}

#[tokio::test]
async fn expire_is_idempotent_and_skips_closed_trades() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);
    let trade = service.open(1, 1, 100, 2, 200).await.unwrap();

    service.expire(trade.id).await.unwrap();
    service.expire(trade.id).await.unwrap();

    let reloaded = TradeRepository::new(db).find(trade.id).await?.unwrap();
    assert_eq!(reloaded.state, trade_state::EXPIRED);

    Ok(())
}

#[tokio::test]
async fn open_rejects_participant_already_in_game() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    // The offerer is mid-game.
    InGameRepository::new(db).set(1, 1, true).await?;

    let service = TradeService::new(db);
    let err = service.open(1, 1, 100, 2, 200).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::AlreadyInGame));

    // Nothing was persisted and the offeree stays free.
    let flags = InGameRepository::new(db);
    assert!(!flags.is_active(1, 2).await?);
    assert!(TradeRepository::new(db).open_trade_for_uid(100).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn draft_validation_rejects_in_game_participants() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    // The offeree is mid-game when the offerer submits the draft.
    InGameRepository::new(db).set(1, 2, true).await?;

    let service = TradeService::new(db);
    let err = service.check_offer(1, 1, 100, 2, 200).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::AlreadyInGame));

    Ok(())
}

#[tokio::test]
async fn participants_hold_the_game_flag_until_closed() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);
    let trade = service.open(1, 1, 100, 2, 200).await.unwrap();

    let flags = InGameRepository::new(db);
    assert!(flags.is_active(1, 1).await?);
    assert!(flags.is_active(1, 2).await?);

    service.accept(trade.id).await.unwrap();
    assert!(!flags.is_active(1, 1).await?);
    assert!(!flags.is_active(1, 2).await?);

    Ok(())
}

#[tokio::test]
async fn decline_and_expire_release_the_game_flag() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(100).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;
    CardInstanceFactory::new(db).uid(300).owner(1).build().await?;
    CardInstanceFactory::new(db).uid(400).owner(2).build().await?;

    let service = TradeService::new(db);
    let flags = InGameRepository::new(db);

    let declined = service.open(1, 1, 100, 2, 200).await.unwrap();
    service.decline(declined.id).await.unwrap();
    assert!(!flags.is_active(1, 1).await?);
    assert!(!flags.is_active(1, 2).await?);

    let expired = service.open(1, 1, 300, 2, 400).await.unwrap();
    service.expire(expired.id).await.unwrap();
    assert!(!flags.is_active(1, 1).await?);
    assert!(!flags.is_active(1, 2).await?);

    Ok(())
}

#[tokio::test]
async fn open_requires_actual_ownership() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_card(db, 5).await?;
    CardInstanceFactory::new(db).uid(200).owner(2).build().await?;

    let service = TradeService::new(db);

    // Offerer claims a uid that does not exist.
    let err = service.open(1, 1, 999, 2, 200).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::CardNotInTrade { uid: 999 }));

    Ok(())
}
