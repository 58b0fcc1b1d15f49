//! Slash-command tree: registration and dispatch.
//!
//! Every command is guild-scoped. Dispatch counts the invocation, runs
//! the per-command role override check, applies the feature toggles, and
//! converts domain errors into ephemeral localized embeds.

pub mod ban;
pub mod cards;
pub mod clear;
pub mod economy;
pub mod game;
pub mod moderation;
pub mod money;
pub mod rank;
pub mod report;
pub mod role;
pub mod roleplay;
pub mod settings;
pub mod warnings;

use sea_orm::ConnectionTrait;
use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, ResolvedOption,
    ResolvedValue, Role, User,
};
use tracing::{error, warn};

use crate::bot::embeds;
use crate::data::economy::InGameRepository;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::{AppError, DomainError};
use crate::locale::matching_locale;
use crate::service::settings::SettingsService;
use crate::state::BotState;

/// The full command tree published on ready.
pub fn register_all() -> Vec<CreateCommand> {
    vec![
        settings::register(),
        money::register(),
        economy::register(),
        cards::register(),
        game::register(),
        rank::register(),
        roleplay::register(),
        ban::register(),
        clear::register(),
        role::register(),
        warnings::register(),
        moderation::register(),
        report::register(),
    ]
}

pub async fn dispatch(state: &BotState, ctx: &Context, command: CommandInteraction) {
    state.stats.count_command(&command.data.name);
    let locale = matching_locale(&command.locale);

    let Some(guild_id) = command.guild_id else {
        let embed = embeds::info(state, locale, "errors.guild_only", &[]);
        let _ = reply_embed(ctx, &command, embed, true).await;
        return;
    };

    if let Err(e) = route(state, ctx, &command, guild_id.get() as i64, locale).await {
        match e.as_domain() {
            Some(domain) => {
                let embed = embeds::error(state, locale, domain);
                if let Err(e) = reply_embed(ctx, &command, embed, true).await {
                    error!(command = %command.data.name, "error reply failed: {e}");
                }
            }
            None => {
                error!(command = %command.data.name, "command failed: {e}");
                state
                    .stats
                    .log_event(format!("command {} failed: {e}", command.data.name));
                let embed = embeds::info(state, locale, "errors.internal", &[]);
                let _ = reply_embed(ctx, &command, embed, true).await;
            }
        }
    }
}

async fn route(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    // Permission overrides and feature toggles need the database; when it
    // is down the commands themselves degrade, so checks are skipped.
    if let Some(db) = state.gateway.connection().await {
        SettingsService::new(&db)
            .check_command_roles(guild_id, &command.data.name, &caller_roles(command))
            .await?;

        let settings = GuildSettingsRepository::new(&db).find(guild_id).await?;
        let economy_on = settings.as_ref().map(|s| s.economy_on).unwrap_or(true);
        let levels_on = settings.as_ref().map(|s| s.levels_on).unwrap_or(true);

        match command.data.name.as_str() {
            "money" | "economy" | "cards" | "game" if !economy_on => {
                let embed = embeds::info(state, locale, "errors.economy_disabled", &[]);
                return reply_embed(ctx, command, embed, true).await;
            }
            "rank" if !levels_on => {
                let embed = embeds::info(state, locale, "errors.levels_disabled", &[]);
                return reply_embed(ctx, command, embed, true).await;
            }
            _ => {}
        }
    }

    match command.data.name.as_str() {
        "settings" => settings::run(state, ctx, command, guild_id, locale).await,
        "money" => money::run(state, ctx, command, guild_id, locale).await,
        "economy" => economy::run(state, ctx, command, guild_id, locale).await,
        "cards" => cards::run(state, ctx, command, guild_id, locale).await,
        "game" => game::run(state, ctx, command, guild_id, locale).await,
        "rank" => rank::run(state, ctx, command, guild_id, locale).await,
        "roleplay" => roleplay::run(state, ctx, command, locale).await,
        "ban" => ban::run(state, ctx, command, guild_id, locale).await,
        "clear" => clear::run(state, ctx, command, locale).await,
        "role" => role::run(state, ctx, command, locale).await,
        "warnings" => warnings::run(state, ctx, command, guild_id, locale).await,
        "moderation" => moderation::run(state, ctx, command, guild_id, locale).await,
        report::COMMAND_NAME => report::run(state, ctx, command, guild_id, locale).await,
        other => {
            warn!("unknown command {other}");
            Ok(())
        }
    }
}

/// Replies with one embed, falling back to a followup when the
/// interaction was already acknowledged.
pub(crate) async fn reply_embed(
    ctx: &Context,
    command: &CommandInteraction,
    embed: CreateEmbed,
    ephemeral: bool,
) -> Result<(), AppError> {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed.clone())
            .ephemeral(ephemeral),
    );

    if command.create_response(&ctx.http, response).await.is_err() {
        command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new()
                    .embed(embed)
                    .ephemeral(ephemeral),
            )
            .await?;
    }
    Ok(())
}

pub(crate) async fn reply_key(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    locale: &str,
    key: &str,
    values: &[&str],
) -> Result<(), AppError> {
    reply_embed(ctx, command, embeds::info(state, locale, key, values), false).await
}

/// The caller's role ids, empty outside a guild.
pub(crate) fn caller_roles(command: &CommandInteraction) -> Vec<u64> {
    command
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| r.get()).collect())
        .unwrap_or_default()
}

/// Raises [`DomainError::AlreadyInGame`] while the member holds the
/// in-game mutex.
pub(crate) async fn ensure_not_in_game<C: ConnectionTrait>(
    db: &C,
    guild_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    if InGameRepository::new(db).is_active(guild_id, user_id).await? {
        return Err(DomainError::AlreadyInGame.into());
    }
    Ok(())
}

/// The invoked subcommand and its options.
pub(crate) fn subcommand<'a>(
    options: &'a [ResolvedOption<'a>],
) -> Option<(&'a str, &'a [ResolvedOption<'a>])> {
    match options.first() {
        Some(ResolvedOption {
            name,
            value: ResolvedValue::SubCommand(opts),
            ..
        }) => Some((name, opts)),
        _ => None,
    }
}

pub(crate) fn str_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|o| match o {
        ResolvedOption {
            name: n,
            value: ResolvedValue::String(s),
            ..
        } if *n == name => Some(*s),
        _ => None,
    })
}

pub(crate) fn int_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find_map(|o| match o {
        ResolvedOption {
            name: n,
            value: ResolvedValue::Integer(v),
            ..
        } if *n == name => Some(*v),
        _ => None,
    })
}

pub(crate) fn user_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find_map(|o| match o {
        ResolvedOption {
            name: n,
            value: ResolvedValue::User(user, _),
            ..
        } if *n == name => Some(*user),
        _ => None,
    })
}

pub(crate) fn role_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a Role> {
    options.iter().find_map(|o| match o {
        ResolvedOption {
            name: n,
            value: ResolvedValue::Role(role),
            ..
        } if *n == name => Some(*role),
        _ => None,
    })
}
