use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory};

use crate::data::economy::{direction, BalanceRepository};
use crate::data::pet::PetRepository;
use crate::error::DomainError;
use crate::service::economy::EconomyService;

#[tokio::test]
async fn pay_with_insufficient_funds_changes_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_economy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_balance(db, 1, 10, 50).await?;
    factory::create_balance(db, 1, 20, 0).await?;

    let service = EconomyService::new(db);
    let err = service.pay(1, 10, 20, 100).await.unwrap_err();
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::NotEnoughMoney { needed: 100, have: 50 })
    );

    let balances = BalanceRepository::new(db);
    assert_eq!(balances.amount(1, 10).await?, 50);
    assert_eq!(balances.amount(1, 20).await?, 0);

    let rows = entity::prelude::Transaction::find().all(db).await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn pay_moves_funds_and_appends_two_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_economy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_balance(db, 1, 10, 200).await?;
    factory::create_balance(db, 1, 20, 10).await?;

    let service = EconomyService::new(db);
    service.pay(1, 10, 20, 75).await.unwrap();

    let balances = BalanceRepository::new(db);
    assert_eq!(balances.amount(1, 10).await?, 125);
    assert_eq!(balances.amount(1, 20).await?, 85);

    let rows = entity::prelude::Transaction::find().all(db).await?;
    assert_eq!(rows.len(), 2);

    let outgoing = rows.iter().find(|t| t.user_id == 10).unwrap();
    assert_eq!(outgoing.kind, direction::OUTGOING);
    assert_eq!(outgoing.amount, 75);

    let incoming = rows.iter().find(|t| t.user_id == 20).unwrap();
    assert_eq!(incoming.kind, direction::INCOMING);
    assert_eq!(incoming.amount, 75);

    Ok(())
}

#[tokio::test]
async fn pay_creates_recipient_balance_row() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_economy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_balance(db, 1, 10, 100).await?;

    let service = EconomyService::new(db);
    service.pay(1, 10, 20, 40).await.unwrap();

    assert_eq!(BalanceRepository::new(db).amount(1, 20).await?, 40);

    Ok(())
}

#[tokio::test]
async fn remove_refuses_overdraft() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_economy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_balance(db, 1, 10, 30).await?;

    let service = EconomyService::new(db);
    let err = service.remove(1, 10, 31, "transactions.admin_remove").await.unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::NotEnoughMoney { needed: 31, have: 30 })
    ));

    assert_eq!(BalanceRepository::new(db).amount(1, 10).await?, 30);

    Ok(())
}

#[tokio::test]
async fn add_and_remove_log_their_direction() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_economy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let service = EconomyService::new(db);
    service.add(1, 10, 100, "transactions.admin_add").await.unwrap();
    service.remove(1, 10, 25, "transactions.admin_remove").await.unwrap();

    assert_eq!(BalanceRepository::new(db).amount(1, 10).await?, 75);

    let rows = entity::prelude::Transaction::find().all(db).await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].kind, direction::INCOMING);
    assert_eq!(rows[1].kind, direction::OUTGOING);

    Ok(())
}

#[tokio::test]
async fn sell_pet_refunds_half_the_shop_price() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_economy_tables()
        .with_table(entity::prelude::Pet)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    PetRepository::new(db).insert(1, 10, "Fluffy", "owl").await?;

    let service = EconomyService::new(db);
    let (pet, refund) = service.sell_pet(1, 10).await.unwrap();
    assert_eq!(pet.name, "Fluffy");
    assert_eq!(refund, 750);

    assert_eq!(BalanceRepository::new(db).amount(1, 10).await?, 750);
    assert!(PetRepository::new(db).find(1, 10).await?.is_none());

    let rows = entity::prelude::Transaction::find().all(db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, direction::INCOMING);
    assert_eq!(rows[0].locale_key, "transactions.sell_pet");

    Ok(())
}

#[tokio::test]
async fn sell_pet_without_one_is_rejected() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_economy_tables()
        .with_table(entity::prelude::Pet)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let err = EconomyService::new(db).sell_pet(1, 10).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::DoesntHavePet));

    Ok(())
}
