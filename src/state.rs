//! Shared bot state.
//!
//! Initialized once in main and handed to the event handler and every
//! scheduler job. All fields are cheap to clone: connection pools and
//! in-memory structures sit behind `Arc`, clients are internally
//! reference-counted.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::activity::ActivityWindow;
use crate::bot::announce::LevelUpAnnouncement;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::locale::Locales;
use crate::render::RenderClient;
use crate::scheduler::LoopSwitchboard;
use crate::service::economy::TransferLimiter;
use crate::stats::CommandStats;
use crate::webhook::WebhookSink;

#[derive(Clone)]
pub struct BotState {
    pub config: Arc<Config>,
    pub gateway: Arc<Gateway>,
    pub locales: Arc<Locales>,
    pub activity: Arc<ActivityWindow>,
    pub render: RenderClient,
    pub webhook: WebhookSink,
    pub stats: Arc<CommandStats>,
    pub transfer_limiter: Arc<TransferLimiter>,

    /// Owner-controlled kill switches for the periodic loops.
    pub loops: Arc<LoopSwitchboard>,

    /// Level-up event bus feeding the announcement listener.
    pub level_events: mpsc::UnboundedSender<LevelUpAnnouncement>,
}
