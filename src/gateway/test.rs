use sea_orm::Value;
use test_utils::builder::TestBuilder;

use super::Gateway;

async fn gateway_with_balance_table() -> Gateway {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Balance)
        .build()
        .await
        .unwrap();

    Gateway::new("sqlite::memory:", test.db.unwrap())
}

const INSERT_BALANCE: &str =
    "INSERT INTO \"balance\" (\"guild_id\", \"user_id\", \"amount\") VALUES (?, ?, ?)";

/// Writes submitted while detached queue instead of raising, and drain in
/// submission order once the connection is back.
#[tokio::test]
async fn queued_writes_replay_in_order() {
    let gateway = gateway_with_balance_table().await;

    let conn = gateway.detach().await.unwrap();
    assert!(!gateway.is_connected().await);

    for i in 1..=3i64 {
        gateway
            .execute(INSERT_BALANCE, vec![Value::from(1i64), Value::from(i), Value::from(i * 10)])
            .await
            .unwrap();
    }
    assert_eq!(gateway.queued_writes().await, 3);

    gateway.attach(conn).await;
    let drained = gateway.replay_pending().await.unwrap();

    assert_eq!(drained, 3);
    assert_eq!(gateway.queued_writes().await, 0);

    let rows = gateway
        .fetch_all(
            "SELECT \"user_id\", \"amount\" FROM \"balance\" ORDER BY \"id\"",
            vec![],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    let first_user: i64 = rows[0].try_get_by_index(0).unwrap();
    let last_amount: i64 = rows[2].try_get_by_index(1).unwrap();
    assert_eq!(first_user, 1);
    assert_eq!(last_amount, 30);
}

/// Reads degrade to empty results while the gateway is detached.
#[tokio::test]
async fn reads_degrade_while_disconnected() {
    let gateway = gateway_with_balance_table().await;
    gateway.detach().await;

    let rows = gateway
        .fetch_all("SELECT * FROM \"balance\"", vec![])
        .await
        .unwrap();
    assert!(rows.is_empty());

    let row = gateway
        .fetch_row("SELECT * FROM \"balance\"", vec![])
        .await
        .unwrap();
    assert!(row.is_none());

    let val: Option<i64> = gateway
        .fetch_val("SELECT COUNT(*) FROM \"balance\"", vec![])
        .await
        .unwrap();
    assert!(val.is_none());
}

/// A connected gateway executes writes immediately, leaving the replay
/// queue empty.
#[tokio::test]
async fn connected_writes_bypass_queue() {
    let gateway = gateway_with_balance_table().await;

    gateway
        .execute(
            INSERT_BALANCE,
            vec![Value::from(5i64), Value::from(6i64), Value::from(700i64)],
        )
        .await
        .unwrap();

    assert_eq!(gateway.queued_writes().await, 0);

    let count: Option<i64> = gateway
        .fetch_val("SELECT COUNT(*) FROM \"balance\"", vec![])
        .await
        .unwrap();
    assert_eq!(count, Some(1));
}

/// Replay with nothing attached is a no-op that keeps the queue intact.
#[tokio::test]
async fn replay_without_connection_keeps_queue() {
    let gateway = gateway_with_balance_table().await;
    gateway.detach().await;

    gateway
        .execute(
            INSERT_BALANCE,
            vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)],
        )
        .await
        .unwrap();

    let drained = gateway.replay_pending().await.unwrap();
    assert_eq!(drained, 0);
    assert_eq!(gateway.queued_writes().await, 1);
}
