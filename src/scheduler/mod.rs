//! Periodic task supervisor.
//!
//! Owns the cron scheduler and the named loops: persistence replay
//! (10 s), banner tick (1 m), trade expiry sweep (1 m), boost reaper
//! (2 m), unban reaper (3 m), analytics flush (5 m), activity reset
//! (2 h). Jobs log failures per iteration and never abort their loop.

pub mod analytics;
pub mod banner;
pub mod moderation;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serenity::cache::Cache;
use serenity::http::Http;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::error::AppError;
use crate::service::trade::TradeService;
use crate::state::BotState;

/// Loops the owner can stop and restart at runtime through the
/// `load`/`unload`/`reload` text commands. The persistence replay loop is
/// not listed; it must never be paused.
pub const PAUSABLE_LOOPS: [&str; 6] = [
    "banner",
    "trade_sweep",
    "boost_reaper",
    "unban_reaper",
    "analytics",
    "activity_reset",
];

/// Runtime kill switches for the periodic loops.
///
/// Jobs stay registered with the cron scheduler; a paused loop skips its
/// body each tick until resumed.
pub struct LoopSwitchboard {
    paused: Mutex<HashSet<&'static str>>,
}

impl LoopSwitchboard {
    pub fn new() -> Self {
        Self {
            paused: Mutex::new(HashSet::new()),
        }
    }

    fn known(name: &str) -> Option<&'static str> {
        PAUSABLE_LOOPS.iter().copied().find(|l| *l == name)
    }

    /// Pauses a loop. Returns false for unknown loop names.
    pub fn pause(&self, name: &str) -> bool {
        match Self::known(name) {
            Some(name) => {
                self.paused.lock().expect("switchboard lock poisoned").insert(name);
                true
            }
            None => false,
        }
    }

    /// Resumes a loop. Returns false for unknown loop names.
    pub fn resume(&self, name: &str) -> bool {
        match Self::known(name) {
            Some(name) => {
                self.paused.lock().expect("switchboard lock poisoned").remove(name);
                true
            }
            None => false,
        }
    }

    pub fn is_paused(&self, name: &str) -> bool {
        self.paused.lock().expect("switchboard lock poisoned").contains(name)
    }
}

impl Default for LoopSwitchboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a scheduler job can need, cloned into each job closure.
#[derive(Clone)]
pub struct JobContext {
    pub state: BotState,
    pub http: Arc<Http>,
    pub cache: Arc<Cache>,
    /// The connected bot's own user id, for the reaper instance gate.
    pub bot_user_id: u64,
}

pub struct Supervisor {
    scheduler: JobScheduler,
    banner_inflight: Arc<banner::InflightGuilds>,
}

impl Supervisor {
    /// Starts every periodic loop. Called once the gateway reports ready.
    pub async fn start(ctx: JobContext) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new().await?;
        let banner_inflight = Arc::new(banner::InflightGuilds::new());

        // Persistence replay, every 10 seconds.
        let job_ctx = ctx.clone();
        scheduler
            .add(Job::new_async("*/10 * * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                Box::pin(async move {
                    ctx.state.gateway.ensure_connected().await;
                    if let Err(e) = ctx.state.gateway.replay_pending().await {
                        error!("replay tick failed: {e}");
                    }
                })
            })?)
            .await?;

        // Banner tick, every minute.
        let job_ctx = ctx.clone();
        let inflight = banner_inflight.clone();
        scheduler
            .add(Job::new_async("0 * * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                let inflight = inflight.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("banner") {
                        return;
                    }
                    if let Err(e) = banner::run_banner_tick(&ctx, &inflight).await {
                        error!("banner tick failed: {e}");
                    }
                })
            })?)
            .await?;

        // Trade expiry sweep, every minute. Backstop for offers whose
        // dialog task died before finalizing.
        let job_ctx = ctx.clone();
        scheduler
            .add(Job::new_async("30 * * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("trade_sweep") {
                        return;
                    }
                    let Some(db) = ctx.state.gateway.connection().await else {
                        return;
                    };
                    if let Err(e) = TradeService::new(&db).expire_stale().await {
                        error!("trade sweep failed: {e}");
                    }
                })
            })?)
            .await?;

        // Boost reaper, every 2 minutes.
        let job_ctx = ctx.clone();
        scheduler
            .add(Job::new_async("0 */2 * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("boost_reaper") {
                        return;
                    }
                    if let Err(e) = banner::run_boost_reaper(&ctx).await {
                        error!("boost reaper failed: {e}");
                    }
                })
            })?)
            .await?;

        // Unban reaper, every 3 minutes.
        let job_ctx = ctx.clone();
        scheduler
            .add(Job::new_async("0 */3 * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("unban_reaper") {
                        return;
                    }
                    if let Err(e) = moderation::run_unban_reaper(&ctx).await {
                        error!("unban reaper failed: {e}");
                    }
                })
            })?)
            .await?;

        // Analytics flush, every 5 minutes; posts once a day at hour 11.
        let job_ctx = ctx.clone();
        let tracker = Arc::new(analytics::DailyPostTracker::new());
        scheduler
            .add(Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                let tracker = tracker.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("analytics") {
                        return;
                    }
                    if let Err(e) = analytics::run_analytics_flush(&ctx, &tracker).await {
                        error!("analytics flush failed: {e}");
                    }
                })
            })?)
            .await?;

        // Activity reset, every 2 hours.
        let job_ctx = ctx.clone();
        scheduler
            .add(Job::new_async("0 0 */2 * * *", move |_uuid, _lock| {
                let ctx = job_ctx.clone();
                Box::pin(async move {
                    if ctx.state.loops.is_paused("activity_reset") {
                        return;
                    }
                    ctx.state.activity.clear();
                })
            })?)
            .await?;

        scheduler.start().await?;
        info!("periodic task supervisor started");

        Ok(Self {
            scheduler,
            banner_inflight,
        })
    }

    /// Stops all loops. In-flight banner renders finish on their own.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.scheduler.shutdown().await?;
        if !self.banner_inflight.is_empty() {
            info!(
                inflight_banners = self.banner_inflight.len(),
                "banner renders still in flight, letting them finish"
            );
        }
        info!("periodic task supervisor stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume_toggle_a_known_loop() {
        let board = LoopSwitchboard::new();
        assert!(!board.is_paused("banner"));

        assert!(board.pause("banner"));
        assert!(board.is_paused("banner"));
        assert!(!board.is_paused("unban_reaper"));

        assert!(board.resume("banner"));
        assert!(!board.is_paused("banner"));
    }

    #[test]
    fn unknown_loop_names_are_rejected() {
        let board = LoopSwitchboard::new();
        assert!(!board.pause("replay"));
        assert!(!board.resume("nope"));
        assert!(!board.is_paused("replay"));
    }

    #[test]
    fn pause_is_idempotent() {
        let board = LoopSwitchboard::new();
        assert!(board.pause("analytics"));
        assert!(board.pause("analytics"));
        assert!(board.resume("analytics"));
        assert!(!board.is_paused("analytics"));
    }
}
