mod activity;
mod bot;
mod cards;
mod config;
mod data;
mod error;
mod game;
mod gateway;
mod locale;
mod render;
mod scheduler;
mod service;
mod startup;
mod state;
mod stats;
mod view;
mod webhook;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::activity::ActivityWindow;
use crate::bot::announce::{self, LevelUpAnnouncement};
use crate::config::Config;
use crate::error::AppError;
use crate::gateway::Gateway;
use crate::locale::Locales;
use crate::render::RenderClient;
use crate::scheduler::{JobContext, LoopSwitchboard, Supervisor};
use crate::service::economy::TransferLimiter;
use crate::state::BotState;
use crate::stats::CommandStats;
use crate::webhook::WebhookSink;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = startup::connect_to_database(&config).await?;
    let gateway = Arc::new(Gateway::new(&config.database_url, db));
    info!("database connected, migrations applied");

    let http_client = startup::setup_reqwest_client();
    let render = RenderClient::new(http_client.clone(), config.render_api_url.clone());
    let webhook = WebhookSink::new(
        http_client,
        config.command_webhook_url.clone(),
        config.day_statistic_webhook_url.clone(),
    );
    let locales = Arc::new(Locales::load(&config.locale_dir)?);

    let (level_tx, level_rx) = mpsc::unbounded_channel::<LevelUpAnnouncement>();

    let state = BotState {
        config,
        gateway,
        locales,
        activity: Arc::new(ActivityWindow::new()),
        render,
        webhook,
        stats: Arc::new(CommandStats::new()),
        transfer_limiter: Arc::new(TransferLimiter::new()),
        loops: Arc::new(LoopSwitchboard::new()),
        level_events: level_tx,
    };

    let client = bot::start::init_bot(state.clone()).await?;

    let bot_user = client.http.get_current_user().await?;
    let supervisor = Supervisor::start(JobContext {
        state: state.clone(),
        http: client.http.clone(),
        cache: client.cache.clone(),
        bot_user_id: bot_user.id.get(),
    })
    .await?;

    tokio::spawn(announce::run_level_up_listener(
        state.clone(),
        client.http.clone(),
        level_rx,
    ));

    let outcome = tokio::select! {
        result = bot::start::start_bot(client) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    if let Err(e) = supervisor.shutdown().await {
        error!("supervisor shutdown failed: {e}");
    }

    outcome
}
