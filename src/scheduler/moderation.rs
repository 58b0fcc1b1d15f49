//! The three-minute unban reaper.

use chrono::Utc;
use serenity::all::{GuildId, UserId};
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::locale::matching_locale;
use crate::scheduler::JobContext;
use crate::service::moderation::ModerationService;

/// Expires due bans: unban platform-side where the ban still exists, then
/// purge the record either way.
///
/// When `CHISATO_REAPER_BOT_ID` is configured, only the instance whose
/// connected bot user matches it runs the sweep, so a multi-instance
/// deployment never double-fires unbans.
pub async fn run_unban_reaper(ctx: &JobContext) -> Result<(), AppError> {
    if let Some(reaper_id) = ctx.state.config.reaper_bot_id {
        if reaper_id != ctx.bot_user_id {
            return Ok(());
        }
    }

    let Some(db) = ctx.state.gateway.connection().await else {
        return Ok(());
    };

    let service = ModerationService::new(&db);
    let due = service.due_bans(Utc::now()).await?;

    for ban in due {
        if let Err(e) = expire_one(ctx, &service, &ban).await {
            // Skip this record; the next sweep retries it.
            error!(ban_id = ban.id, "failed to expire ban: {e}");
        }
    }

    Ok(())
}

async fn expire_one(
    ctx: &JobContext,
    service: &ModerationService<'_>,
    ban: &entity::global_ban::Model,
) -> Result<(), AppError> {
    let guild_id = GuildId::new(ban.guild_id as u64);
    let user_id = UserId::new(ban.user_id as u64);

    // Guild gone: nothing to unban, purge the record.
    let Ok(guild) = ctx.http.get_guild(guild_id).await else {
        debug!(ban_id = ban.id, "guild unavailable, purging ban record");
        service.purge_ban(ban.id).await?;
        return Ok(());
    };

    // Ban lifted manually platform-side: purge without an unban call.
    if ctx.http.get_ban(guild_id, user_id).await.is_err() {
        debug!(ban_id = ban.id, "platform ban already lifted, purging record");
        service.purge_ban(ban.id).await?;
        return Ok(());
    }

    let reason = ctx.state.locales.get(
        "moderation.unban_reason",
        matching_locale(&guild.preferred_locale),
        &[],
    );
    ctx.http.remove_ban(guild_id, user_id, Some(&reason)).await?;
    service.purge_ban(ban.id).await?;

    info!(guild_id = ban.guild_id, user_id = ban.user_id, "temporary ban expired");
    Ok(())
}
