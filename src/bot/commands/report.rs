//! Message-report flow.
//!
//! A context-menu command posts the reported message into the configured
//! reports channel with verdict buttons. Those buttons outlive any
//! collector, so they carry the target in the custom id and are routed
//! through the global interaction handler.

use chrono::{Duration, Utc};
use serenity::all::{
    ButtonStyle, CommandInteraction, CommandType, ComponentInteraction, Context, CreateActionRow,
    CreateButton, CreateCommand, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditMember, Permissions,
    ResolvedTarget, Timestamp, UserId,
};
use tracing::error;

use crate::bot::commands::reply_embed;
use crate::bot::embeds;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::{AppError, DomainError};
use crate::locale::matching_locale;
use crate::service::moderation::ModerationService;
use crate::state::BotState;

pub const COMMAND_NAME: &str = "Report message";
pub const CUSTOM_ID_PREFIX: &str = "report:";

/// Timeout verdicts mute for one hour.
const TIMEOUT_MINUTES: i64 = 60;

const SUPPORTED_LOCALES: [&str; 3] = ["en-US", "ru", "uk"];

pub fn register() -> CreateCommand {
    CreateCommand::new(COMMAND_NAME)
        .kind(CommandType::Message)
        .name_localized("ru", "Пожаловаться на сообщение")
        .name_localized("uk", "Поскаржитися на повідомлення")
}

pub async fn run(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    let Some(ResolvedTarget::Message(message)) = command.data.target() else {
        return Ok(());
    };

    let Some(db) = state.gateway.connection().await else {
        let embed = embeds::info(state, locale, "errors.database_offline", &[]);
        return reply_embed(ctx, command, embed, true).await;
    };

    let settings = GuildSettingsRepository::new(&db).find(guild_id).await?;
    let Some(channel_id) = settings.and_then(|s| s.reports_channel_id) else {
        let embed = embeds::info(state, locale, "moderation.report.no_channel", &[]);
        return reply_embed(ctx, command, embed, true).await;
    };

    // The reports channel speaks the guild's locale, not the reporter's.
    let guild_locale = command
        .guild_id
        .and_then(|g| ctx.cache.guild(g).map(|g| matching_locale(&g.preferred_locale)))
        .unwrap_or("en-US");

    let embed = embeds::titled(
        state,
        guild_locale,
        "moderation.report.posted",
        &[
            &format!("<@{}>", message.author.id.get()),
            &message.link(),
            &format!("<@{}>", command.user.id.get()),
        ],
    )
    .description(format!(
        "{}\n\n{}",
        message.content,
        state.locales.get("moderation.report.pending", guild_locale, &[]),
    ));

    serenity::all::ChannelId::new(channel_id as u64)
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .embed(embed)
                .components(vec![verdict_buttons(state, guild_locale, message.author.id)]),
        )
        .await?;

    let embed = embeds::info(state, locale, "moderation.report.sent", &[]);
    reply_embed(ctx, command, embed, true).await
}

fn verdict_buttons(state: &BotState, locale: &str, target: UserId) -> CreateActionRow {
    let button = |action: &str, style: ButtonStyle| {
        CreateButton::new(format!("{CUSTOM_ID_PREFIX}{action}:{}", target.get()))
            .label(state.locales.get(&format!("moderation.report.{action}"), locale, &[]))
            .style(style)
    };
    CreateActionRow::Buttons(vec![
        button("warn", ButtonStyle::Primary),
        button("timeout", ButtonStyle::Primary),
        button("kick", ButtonStyle::Danger),
        button("ban", ButtonStyle::Danger),
        button("decline", ButtonStyle::Secondary),
    ])
}

pub async fn handle_component(state: &BotState, ctx: &Context, component: ComponentInteraction) {
    if let Err(e) = verdict(state, ctx, &component).await {
        error!(custom_id = %component.data.custom_id, "report verdict failed: {e}");
        let locale = matching_locale(&component.locale);
        let key = match e.as_domain() {
            Some(domain) => domain.locale_key(),
            None => "errors.internal",
        };
        let embed = embeds::info(state, locale, key, &[]);
        let _ = component
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new().embed(embed).ephemeral(true),
                ),
            )
            .await;
    }
}

async fn verdict(
    state: &BotState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    let locale = matching_locale(&component.locale);
    let guild_id = component.guild_id.ok_or(DomainError::MemberNotFound)?;

    let allowed = component
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .map(|p| p.contains(Permissions::MODERATE_MEMBERS))
        .unwrap_or(false);
    if !allowed {
        return Err(DomainError::DoesntHaveAgreedRole { required_roles: vec![] }.into());
    }

    let rest = component
        .data
        .custom_id
        .strip_prefix(CUSTOM_ID_PREFIX)
        .ok_or(DomainError::MemberNotFound)?;
    let (action, raw_user) = rest.split_once(':').ok_or(DomainError::MemberNotFound)?;
    let target: u64 = raw_user.parse().map_err(|_| DomainError::MemberNotFound)?;
    let target_id = UserId::new(target);

    let Some(db) = state.gateway.connection().await else {
        let embed = embeds::info(state, locale, "errors.database_offline", &[]);
        component
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new().embed(embed).ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    };

    let moderator = component.user.id.get() as i64;
    let reason = state.locales.get("moderation.report.reason", locale, &[]);
    let service = ModerationService::new(&db);

    let declined = action == "decline";
    match action {
        "warn" => {
            service
                .add_warn(guild_id.get() as i64, target as i64, moderator, &reason)
                .await
                .map(|_| ())?;
        }
        "timeout" => {
            let until = Timestamp::from_unix_timestamp(
                (Utc::now() + Duration::minutes(TIMEOUT_MINUTES)).timestamp(),
            )
            .map_err(|e| AppError::InternalError(e.to_string()))?;
            guild_id
                .edit_member(
                    &ctx.http,
                    target_id,
                    EditMember::new().disable_communication_until_datetime(until),
                )
                .await?;
            service.record_timeout(guild_id.get() as i64, target as i64, moderator).await?;
        }
        "kick" => {
            guild_id.kick_with_reason(&ctx.http, target_id, &reason).await?;
        }
        "ban" => {
            guild_id.ban_with_reason(&ctx.http, target_id, 0, &reason).await?;
            service
                .add_ban(guild_id.get() as i64, target as i64, moderator, &reason, None)
                .await
                .map(|_| ())?;
        }
        "decline" => {}
        _ => return Ok(()),
    }

    close_report(state, ctx, component, declined, action).await
}

/// Rewrites the pending status line and replaces the verdict buttons with
/// one disabled button naming the moderator.
async fn close_report(
    state: &BotState,
    ctx: &Context,
    component: &ComponentInteraction,
    declined: bool,
    action: &str,
) -> Result<(), AppError> {
    let message = &component.message;
    let old = message.embeds.first();

    let mut description = old.and_then(|e| e.description.clone()).unwrap_or_default();
    let verdict_key = if declined { "moderation.report.declined" } else { "moderation.report.checked" };
    for tag in SUPPORTED_LOCALES {
        let pending = state.locales.get("moderation.report.pending", tag, &[]);
        if description.contains(&pending) {
            description = description.replace(&pending, &state.locales.get(verdict_key, tag, &[]));
            break;
        }
    }

    let locale = matching_locale(&component.locale);
    let mut embed = CreateEmbed::new()
        .color(if declined { 0x99AAB5 } else { state.config.color })
        .description(description);
    if let Some(old) = old {
        if let Some(title) = &old.title {
            embed = embed.title(title.clone());
        }
    }

    let verdict = CreateButton::new("report:closed")
        .label(state.locales.get(
            &format!("moderation.report.verdict.{action}"),
            locale,
            &[&component.user.name],
        ))
        .style(ButtonStyle::Secondary)
        .disabled(true);

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![CreateActionRow::Buttons(vec![verdict])]),
            ),
        )
        .await?;
    Ok(())
}
