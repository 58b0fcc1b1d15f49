//! Banner rotation: the per-guild minute tick and the boost reaper.

use std::collections::HashSet;
use std::sync::Mutex;

use sea_orm::DatabaseConnection;
use serenity::all::{CreateAttachment, GuildId};
use serenity::builder::EditGuild;
use tracing::{debug, error, warn};

use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::AppError;
use crate::locale::matching_locale;
use crate::render::recipe;
use crate::scheduler::JobContext;
use crate::service::banner;

/// Per-guild inflight flags so one slow render never stacks up with the
/// next minute's tick for the same guild.
pub struct InflightGuilds {
    guilds: Mutex<HashSet<u64>>,
}

impl InflightGuilds {
    pub fn new() -> Self {
        Self {
            guilds: Mutex::new(HashSet::new()),
        }
    }

    /// Claims the guild for this tick.
    ///
    /// # Returns
    /// - `true` - claimed; the caller must call [`end`](Self::end)
    /// - `false` - a render for this guild is still in flight
    pub fn begin(&self, guild_id: u64) -> bool {
        self.guilds
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(guild_id)
    }

    pub fn end(&self, guild_id: u64) {
        self.guilds
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&guild_id);
    }

    pub fn len(&self) -> usize {
        self.guilds.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InflightGuilds {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the render call needs, snapshotted out of the cache so no
/// cache guard is held across an await.
struct GuildSnapshot {
    locale: &'static str,
    member_count: u64,
    voice_member_count: usize,
    feature_name: String,
    feature_avatar_url: String,
}

/// One minute tick: dispatch a concurrent render task per configured
/// guild, skipping guilds with a render still in flight.
pub async fn run_banner_tick(
    ctx: &JobContext,
    inflight: &std::sync::Arc<InflightGuilds>,
) -> Result<(), AppError> {
    let Some(db) = ctx.state.gateway.connection().await else {
        return Ok(());
    };

    let configured = GuildSettingsRepository::new(&db).with_banner_style().await?;

    for settings in configured {
        let guild_id = settings.guild_id as u64;
        let Some(style) = settings.banner_style.clone() else {
            continue;
        };

        if !inflight.begin(guild_id) {
            debug!(guild_id, "banner render still in flight, skipping tick");
            continue;
        }

        let ctx = ctx.clone();
        let inflight = inflight.clone();
        tokio::spawn(async move {
            if let Err(e) = render_guild_banner(&ctx, guild_id, &style).await {
                error!(guild_id, "banner render failed: {e}");
            }
            inflight.end(guild_id);
        });
    }

    Ok(())
}

async fn render_guild_banner(ctx: &JobContext, guild_id: u64, style: &str) -> Result<(), AppError> {
    if !ctx.state.render.get_status().await {
        ctx.state
            .webhook
            .command_alert(&format!("render service offline, skipping banner for guild {guild_id}"))
            .await;
        return Ok(());
    }

    let Some(snapshot) = snapshot_guild(ctx, guild_id) else {
        return Ok(());
    };

    let phrase = banner::activity_phrase(&mut rand::rng());
    let image = ctx
        .state
        .render
        .draw(
            recipe::GUILD_BANNER,
            &[
                ("style", style),
                ("locale", snapshot.locale),
                ("members", &snapshot.member_count.to_string()),
                ("voice_members", &snapshot.voice_member_count.to_string()),
                ("member_name", &snapshot.feature_name),
                ("member_avatar", &snapshot.feature_avatar_url),
                ("phrase", phrase),
            ],
        )
        .await?;

    publish_banner(ctx, guild_id, image).await;
    Ok(())
}

/// Reads the guild out of the cache and picks the featured member.
fn snapshot_guild(ctx: &JobContext, guild_id: u64) -> Option<GuildSnapshot> {
    let guild = ctx.cache.guild(GuildId::new(guild_id))?;

    let most_active = ctx.state.activity.most_active(guild_id).map(|(user, _)| user);
    let voice_members: Vec<u64> = guild.voice_states.keys().map(|id| id.get()).collect();
    let all_members: Vec<u64> = guild.members.keys().map(|id| id.get()).collect();

    let featured = banner::select_feature_member(
        &mut rand::rng(),
        most_active,
        &voice_members,
        &all_members,
    )?;

    let member = guild.members.get(&featured.into())?;

    Some(GuildSnapshot {
        locale: matching_locale(&guild.preferred_locale),
        member_count: guild.member_count,
        voice_member_count: voice_members.len(),
        feature_name: member.display_name().to_string(),
        feature_avatar_url: member.face(),
    })
}

/// Applies the rendered image as the guild banner.
///
/// Permission-denied and not-found are expected states (banner feature
/// toggled off platform-side, guild gone) and are swallowed; other
/// transport errors are logged.
async fn publish_banner(ctx: &JobContext, guild_id: u64, image: Vec<u8>) {
    let encoded = CreateAttachment::bytes(image, "banner.png").to_base64();
    let edit = EditGuild::new().banner(Some(encoded));

    if let Err(e) = GuildId::new(guild_id).edit(&ctx.http, edit).await {
        if !is_benign_http_error(&e) {
            warn!(guild_id, "banner publish failed: {e}");
        }
    }
}

fn is_benign_http_error(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(resp)) => {
            resp.status_code == reqwest::StatusCode::FORBIDDEN
                || resp.status_code == reqwest::StatusCode::NOT_FOUND
        }
        _ => false,
    }
}

/// Two-minute reaper: clear the banner style of every configured guild
/// whose boost count fell to the threshold or below.
pub async fn run_boost_reaper(ctx: &JobContext) -> Result<(), AppError> {
    let Some(db) = ctx.state.gateway.connection().await else {
        return Ok(());
    };

    let configured = GuildSettingsRepository::new(&db).with_banner_style().await?;

    for settings in configured {
        let guild_id = settings.guild_id as u64;

        let boosts = ctx
            .cache
            .guild(GuildId::new(guild_id))
            .map(|g| g.premium_subscription_count.unwrap_or(0))
            .unwrap_or(0);

        if banner::ensure_boosts(boosts).is_err() {
            revoke_banner_style(&db, settings.guild_id, boosts).await;
        }
    }

    Ok(())
}

async fn revoke_banner_style(db: &DatabaseConnection, guild_id: i64, boosts: u64) {
    match GuildSettingsRepository::new(db).set_banner_style(guild_id, None).await {
        Ok(_) => debug!(guild_id, boosts, "banner style revoked, boost count too low"),
        Err(e) => error!(guild_id, "failed to revoke banner style: {e}"),
    }
}
