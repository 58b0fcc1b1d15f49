use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::card_instance::CardInstanceFactory};

use crate::data::cards::{
    trade_state, CardInstanceRepository, InventorySort, TradeRepository, CARDS_PER_PAGE,
};

#[tokio::test]
async fn uids_grow_from_historical_max() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CardInstanceRepository::new(db);
    assert_eq!(repo.next_uid().await?, 1);

    CardInstanceFactory::new(db).uid(7).build().await?;
    assert_eq!(repo.next_uid().await?, 8);

    Ok(())
}

#[tokio::test]
async fn inventory_pages_at_fifteen() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for i in 0..(CARDS_PER_PAGE as i64 + 2) {
        CardInstanceFactory::new(db).uid(i + 1).owner(9).build().await?;
    }
    factory::create_card(db, 10).await?;

    let repo = CardInstanceRepository::new(db);
    let (first, total_pages) = repo.list_owner_page(9, InventorySort::ByUidAsc, 0).await?;

    assert_eq!(total_pages, 2);
    assert_eq!(first.len(), CARDS_PER_PAGE);
    assert_eq!(first[0].uid, 1);

    let (second, _) = repo.list_owner_page(9, InventorySort::ByUidAsc, 1).await?;
    assert_eq!(second.len(), 2);

    Ok(())
}

#[tokio::test]
async fn rarity_sort_puts_legendary_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    CardInstanceFactory::new(db).uid(1).owner(9).rarity("common").build().await?;
    CardInstanceFactory::new(db).uid(2).owner(9).rarity("legendary").build().await?;
    CardInstanceFactory::new(db).uid(3).owner(9).rarity("rare").build().await?;

    let repo = CardInstanceRepository::new(db);
    let (rows, _) = repo
        .list_owner_page(9, InventorySort::ByRarityPriority, 0)
        .await?;

    let rarities: Vec<&str> = rows.iter().map(|c| c.rarity.as_str()).collect();
    assert_eq!(rarities, vec!["legendary", "rare", "common"]);

    Ok(())
}

#[tokio::test]
async fn set_owner_moves_the_instance() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let card = factory::create_card(db, 9).await?;

    let repo = CardInstanceRepository::new(db);
    repo.set_owner(card.uid, 10).await?;

    let moved = repo.find_by_uid(card.uid).await?.unwrap();
    assert_eq!(moved.owner_user_id, 10);

    Ok(())
}

#[tokio::test]
async fn open_trade_locks_both_uids() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let trade = factory::create_open_trade(db, 1, (9, 100), (10, 200)).await?;

    let repo = TradeRepository::new(db);
    assert_eq!(repo.open_trade_for_uid(100).await?.unwrap().id, trade.id);
    assert_eq!(repo.open_trade_for_uid(200).await?.unwrap().id, trade.id);
    assert!(repo.open_trade_for_uid(300).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn terminal_trades_release_the_lock() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let trade = factory::create_open_trade(db, 1, (9, 100), (10, 200)).await?;

    let repo = TradeRepository::new(db);
    repo.set_state(trade.id, trade_state::DECLINED).await?;

    assert!(repo.open_trade_for_uid(100).await?.is_none());
    assert!(repo.open_trade_for_uid(200).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn expiry_sweep_sees_only_stale_open_trades() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_card_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stale = factory::create_open_trade(db, 1, (9, 100), (10, 200)).await?;
    let done = factory::create_open_trade(db, 1, (9, 101), (10, 201)).await?;

    let repo = TradeRepository::new(db);
    repo.set_state(done.id, trade_state::ACCEPTED).await?;

    let cutoff = Utc::now() + Duration::minutes(1);
    let sweep = repo.open_older_than(cutoff).await?;

    assert_eq!(sweep.len(), 1);
    assert_eq!(sweep[0].id, stale.id);

    Ok(())
}
