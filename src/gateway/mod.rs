//! Persistence gateway with a lost-write replay queue.
//!
//! Wraps the SeaORM connection so that a dropped database never surfaces
//! as a command failure: writes submitted while the connection is down are
//! appended to an ordered replay queue and executed once connectivity is
//! restored; reads degrade to empty results. Reconnection attempts are
//! rate-limited and single-flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

#[cfg(test)]
mod test;

/// Minimum spacing between reconnect attempts.
const RECONNECT_WINDOW: Duration = Duration::from_secs(20);

/// A write that failed while the connection was down, kept for replay.
#[derive(Debug, Clone)]
struct QueuedWrite {
    sql: String,
    values: Vec<Value>,
}

/// Connection wrapper with write replay and rate-limited reconnect.
///
/// All periodic loops and event handlers share one `Gateway`. Writes go
/// through [`execute`](Gateway::execute); richer typed queries borrow the
/// live connection via [`connection`](Gateway::connection) and degrade to
/// "feature unavailable" when it returns `None`.
pub struct Gateway {
    dsn: String,
    conn: RwLock<Option<DatabaseConnection>>,
    replay: Mutex<VecDeque<QueuedWrite>>,
    last_attempt: Mutex<Option<Instant>>,
    reconnecting: AtomicBool,
}

impl Gateway {
    /// Creates a gateway around an already-established connection.
    pub fn new(dsn: impl Into<String>, conn: DatabaseConnection) -> Self {
        Self {
            dsn: dsn.into(),
            conn: RwLock::new(Some(conn)),
            replay: Mutex::new(VecDeque::new()),
            last_attempt: Mutex::new(None),
            reconnecting: AtomicBool::new(false),
        }
    }

    /// Returns a clone of the live connection, or `None` while disconnected.
    ///
    /// `DatabaseConnection` is internally reference-counted, so cloning is
    /// cheap and the caller does not hold the gateway lock across awaits.
    pub async fn connection(&self) -> Option<DatabaseConnection> {
        self.conn.read().await.clone()
    }

    /// True when a connection is currently attached.
    pub async fn is_connected(&self) -> bool {
        self.conn.read().await.is_some()
    }

    /// Number of writes waiting for replay.
    pub async fn queued_writes(&self) -> usize {
        self.replay.lock().await.len()
    }

    /// Detaches the current connection, returning it if one was attached.
    ///
    /// Subsequent writes queue for replay and reads return empty results
    /// until a connection is re-attached.
    pub async fn detach(&self) -> Option<DatabaseConnection> {
        self.conn.write().await.take()
    }

    /// Attaches a connection, making the gateway live again.
    pub async fn attach(&self, conn: DatabaseConnection) {
        *self.conn.write().await = Some(conn);
    }

    /// Executes a write statement.
    ///
    /// Never raises for connectivity problems: if the gateway is
    /// disconnected, or the statement fails with a connection-class error,
    /// the `(sql, values)` pair is appended to the replay queue and the
    /// call returns `Ok`. Non-connection errors propagate.
    pub async fn execute(&self, sql: &str, values: Vec<Value>) -> Result<(), DbErr> {
        let Some(conn) = self.connection().await else {
            self.enqueue(sql, values).await;
            return Ok(());
        };

        let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, values.clone());
        match conn.execute_raw(stmt).await {
            Ok(_) => Ok(()),
            Err(e) if is_connection_error(&e) => {
                warn!("write failed with connection error, queueing for replay: {e}");
                self.mark_disconnected().await;
                self.enqueue(sql, values).await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches all rows for a query. Returns an empty vec while
    /// disconnected or on a connection-class failure.
    pub async fn fetch_all(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<sea_orm::QueryResult>, DbErr> {
        let Some(conn) = self.connection().await else {
            return Ok(Vec::new());
        };

        let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, values);
        match conn.query_all_raw(stmt).await {
            Ok(rows) => Ok(rows),
            Err(e) if is_connection_error(&e) => {
                self.mark_disconnected().await;
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches a single row. Returns `None` while disconnected or on a
    /// connection-class failure.
    pub async fn fetch_row(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Option<sea_orm::QueryResult>, DbErr> {
        let Some(conn) = self.connection().await else {
            return Ok(None);
        };

        let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, values);
        match conn.query_one_raw(stmt).await {
            Ok(row) => Ok(row),
            Err(e) if is_connection_error(&e) => {
                self.mark_disconnected().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches a single scalar value from the first column of the first
    /// row. Degrades to `None` like [`fetch_row`](Gateway::fetch_row).
    pub async fn fetch_val<T>(&self, sql: &str, values: Vec<Value>) -> Result<Option<T>, DbErr>
    where
        T: sea_orm::TryGetable,
    {
        let row = self.fetch_row(sql, values).await?;
        match row {
            Some(row) => Ok(Some(row.try_get_by_index::<T>(0)?)),
            None => Ok(None),
        }
    }

    /// Drains the replay queue in insertion order.
    ///
    /// Entries that execute successfully are dropped; the drain stops at
    /// the first entry that still fails so submission order is preserved
    /// for the next tick. No-op while disconnected.
    pub async fn replay_pending(&self) -> Result<usize, DbErr> {
        let Some(conn) = self.connection().await else {
            return Ok(0);
        };

        let mut drained = 0usize;
        let mut queue = self.replay.lock().await;

        while let Some(write) = queue.front().cloned() {
            let stmt = Statement::from_sql_and_values(
                conn.get_database_backend(),
                &write.sql,
                write.values.clone(),
            );

            match conn.execute_raw(stmt).await {
                Ok(_) => {
                    queue.pop_front();
                    drained += 1;
                }
                Err(e) if is_connection_error(&e) => {
                    warn!("replay interrupted by connection error: {e}");
                    drop(queue);
                    self.mark_disconnected().await;
                    return Ok(drained);
                }
                Err(e) => {
                    // Leave the entry in place so order is preserved; the
                    // next tick retries it.
                    warn!("replay entry still failing: {e}");
                    return Ok(drained);
                }
            }
        }

        if drained > 0 {
            info!("replayed {drained} queued writes");
        }

        Ok(drained)
    }

    /// Attempts to reconnect if currently disconnected.
    ///
    /// Rate-limited to one attempt per 20-second window and single-flight:
    /// concurrent callers observing a dead connection return immediately
    /// while one caller performs the connect.
    pub async fn ensure_connected(&self) {
        if self.is_connected().await {
            return;
        }

        {
            let mut last = self.last_attempt.lock().await;
            if let Some(at) = *last {
                if at.elapsed() < RECONNECT_WINDOW {
                    return;
                }
            }
            *last = Some(Instant::now());
        }

        if self
            .reconnecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        match Database::connect(self.dsn.as_str()).await {
            Ok(conn) => {
                info!("database reconnected");
                self.attach(conn).await;
            }
            Err(e) => {
                warn!("database reconnect failed: {e}");
            }
        }

        self.reconnecting.store(false, Ordering::SeqCst);
    }

    async fn enqueue(&self, sql: &str, values: Vec<Value>) {
        self.replay.lock().await.push_back(QueuedWrite {
            sql: sql.to_string(),
            values,
        });
    }

    async fn mark_disconnected(&self) {
        self.conn.write().await.take();
    }
}

/// Classifies a `DbErr` as connection-class.
///
/// Connection-class failures are reinterpreted as "queue for replay" for
/// writes and "empty result" for reads; everything else propagates.
fn is_connection_error(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}
