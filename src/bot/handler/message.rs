//! Message listener: activity window, XP accrual, owner text commands.

use rand::Rng;
use serenity::all::{Context, Message};
use tracing::error;

use crate::bot::announce::LevelUpAnnouncement;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::locale::matching_locale;
use crate::scheduler::PAUSABLE_LOOPS;
use crate::service::leveling::LevelingService;
use crate::state::BotState;

/// XP granted per message, drawn uniformly.
const MESSAGE_EXP_RANGE: std::ops::RangeInclusive<i64> = 5..=10;

pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }
    let Some(guild_id) = message.guild_id else {
        return;
    };

    if let Some(rest) = message.content.strip_prefix(&state.config.default_prefix) {
        if state.config.owner_ids.contains(&message.author.id.get())
            && handle_owner_command(state, &ctx, &message, rest).await
        {
            return;
        }
    }

    state.activity.bump(guild_id.get(), message.author.id.get());

    let Some(db) = state.gateway.connection().await else {
        return;
    };

    let levels_on = match GuildSettingsRepository::new(&db).find(guild_id.get() as i64).await {
        Ok(settings) => settings.map(|s| s.levels_on).unwrap_or(true),
        Err(e) => {
            error!(guild_id = guild_id.get(), "settings lookup failed: {e}");
            return;
        }
    };
    if !levels_on {
        return;
    }

    let exp = rand::rng().random_range(MESSAGE_EXP_RANGE);
    let accrued = LevelingService::new(&db)
        .apply_message_exp(guild_id.get() as i64, message.author.id.get() as i64, exp)
        .await;

    match accrued {
        Ok(Some(up)) => {
            let locale = ctx
                .cache
                .guild(guild_id)
                .map(|g| matching_locale(&g.preferred_locale))
                .unwrap_or("en-US");

            // Receiver gone means shutdown is in progress; nothing to do.
            let _ = state.level_events.send(LevelUpAnnouncement {
                channel_id: message.channel_id.get(),
                locale,
                member_name: message.author.name.clone(),
                member_avatar: message.author.face(),
                up,
            });
        }
        Ok(None) => {}
        Err(e) => error!(guild_id = guild_id.get(), "xp accrual failed: {e}"),
    }
}

/// Owner-only text commands. Returns true when the message was consumed.
async fn handle_owner_command(
    state: &BotState,
    ctx: &Context,
    message: &Message,
    rest: &str,
) -> bool {
    let mut parts = rest.trim().split_whitespace();
    let Some(verb) = parts.next() else {
        return false;
    };

    let body = match verb {
        "cs" | "command_stats" => {
            let histogram = state.stats.histogram();
            if histogram.is_empty() {
                "no commands counted yet".to_string()
            } else {
                format!("```\n{histogram}\n```")
            }
        }
        // Runtime stop/restart of the named periodic loops.
        "load" | "unload" | "reload" => {
            let Some(name) = parts.next() else {
                return false;
            };
            let known = match verb {
                "unload" => state.loops.pause(name),
                _ => state.loops.resume(name),
            };
            if known {
                let status = if verb == "unload" { "stopped" } else { "running" };
                format!("loop `{name}` {status}")
            } else {
                format!("unknown loop `{name}`; known: {}", PAUSABLE_LOOPS.join(", "))
            }
        }
        _ => return false,
    };

    if let Err(e) = message.channel_id.say(&ctx.http, body).await {
        error!("owner command reply failed: {e}");
    }
    true
}
