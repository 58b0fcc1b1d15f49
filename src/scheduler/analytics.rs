//! Daily analytics flush.
//!
//! The loop ticks every five minutes but posts at most once per day, at
//! hour 11 local time. The post carries the drained event log and the
//! per-command usage histogram as text attachments.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDate, Timelike, Utc};

use crate::data::economy::TransactionRepository;
use crate::error::AppError;
use crate::scheduler::JobContext;

/// Hour of day (local time) the daily post fires.
const POST_HOUR: u32 = 11;

/// Transaction-log retention applied alongside the daily post.
const TRANSACTION_RETENTION_DAYS: i64 = 30;

/// Remembers which day was already posted so the five-minute tick fires
/// the daily post exactly once.
pub struct DailyPostTracker {
    last_posted: Mutex<Option<NaiveDate>>,
}

impl DailyPostTracker {
    pub fn new() -> Self {
        Self {
            last_posted: Mutex::new(None),
        }
    }

    /// Claims today's post slot.
    pub fn claim(&self, today: NaiveDate) -> bool {
        let mut last = self.last_posted.lock().unwrap_or_else(|e| e.into_inner());
        if *last == Some(today) {
            return false;
        }
        *last = Some(today);
        true
    }
}

impl Default for DailyPostTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run_analytics_flush(
    ctx: &JobContext,
    tracker: &DailyPostTracker,
) -> Result<(), AppError> {
    let now = Local::now();
    if now.hour() != POST_HOUR || !tracker.claim(now.date_naive()) {
        return Ok(());
    }

    let (event_log, histogram) = ctx.state.stats.drain();
    ctx.state
        .webhook
        .day_statistic(
            &format!("Daily statistics for {}", now.date_naive()),
            event_log,
            histogram,
        )
        .await?;

    // Transaction-log retention rides along with the daily post.
    if let Some(db) = ctx.state.gateway.connection().await {
        let cutoff = Utc::now() - Duration::days(TRANSACTION_RETENTION_DAYS);
        let purged = TransactionRepository::new(&db).purge_before(cutoff).await?;
        if purged > 0 {
            tracing::info!(purged, "purged expired transaction rows");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_claims_each_day_once() {
        let tracker = DailyPostTracker::new();
        let day1 = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        assert!(tracker.claim(day1));
        assert!(!tracker.claim(day1));
        assert!(tracker.claim(day2));
        assert!(!tracker.claim(day2));
    }
}
