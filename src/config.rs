use std::collections::HashSet;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_COLOR: u32 = 0x2B2D31;

/// Application configuration sourced from the process environment.
pub struct Config {
    pub database_url: String,

    pub bot_token: String,
    pub invite_url: Option<String>,
    pub default_prefix: String,
    pub color: u32,
    pub main_guild_id: u64,
    pub owner_ids: HashSet<u64>,

    pub render_api_url: String,
    pub locale_dir: String,

    pub command_webhook_url: Option<String>,
    pub guild_webhook_url: Option<String>,
    pub day_statistic_webhook_url: Option<String>,
    pub shards_control_webhook_url: Option<String>,

    pub listing_token_primary: Option<String>,
    pub listing_token_secondary: Option<String>,

    /// When set, expiry reapers only run on the instance whose connected
    /// bot user matches this id. Prevents multi-instance double-firing.
    pub reaper_bot_id: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            bot_token: std::env::var("CHISATO_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("CHISATO_BOT_TOKEN".to_string()))?,
            invite_url: std::env::var("CHISATO_INVITE_URL").ok(),
            default_prefix: std::env::var("CHISATO_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            color: std::env::var("CHISATO_COLOR")
                .ok()
                .and_then(|v| u32::from_str_radix(v.trim_start_matches("0x"), 16).ok())
                .unwrap_or(DEFAULT_COLOR),
            main_guild_id: std::env::var("CHISATO_MAIN_GUILD_ID")
                .map_err(|_| ConfigError::MissingEnvVar("CHISATO_MAIN_GUILD_ID".to_string()))?
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("CHISATO_MAIN_GUILD_ID".to_string()))?,
            owner_ids: std::env::var("CHISATO_OWNER_IDS")
                .unwrap_or_default()
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect(),
            render_api_url: std::env::var("CHISATO_RENDER_API_URL")
                .map_err(|_| ConfigError::MissingEnvVar("CHISATO_RENDER_API_URL".to_string()))?,
            locale_dir: std::env::var("CHISATO_LOCALE_DIR").unwrap_or_else(|_| "locale".to_string()),
            command_webhook_url: std::env::var("CHISATO_COMMAND_WEBHOOK_URL").ok(),
            guild_webhook_url: std::env::var("CHISATO_GUILD_WEBHOOK_URL").ok(),
            day_statistic_webhook_url: std::env::var("CHISATO_DAY_STATISTIC_WEBHOOK_URL").ok(),
            shards_control_webhook_url: std::env::var("CHISATO_SHARDS_CONTROL_WEBHOOK_URL").ok(),
            listing_token_primary: std::env::var("CHISATO_LISTING_TOKEN_PRIMARY").ok(),
            listing_token_secondary: std::env::var("CHISATO_LISTING_TOKEN_SECONDARY").ok(),
            reaper_bot_id: std::env::var("CHISATO_REAPER_BOT_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }
}
