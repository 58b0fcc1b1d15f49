//! `/ban add`: platform ban plus a persisted record for the unban reaper.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption, Permissions,
};

use crate::bot::commands::{reply_embed, reply_key, str_option, subcommand, user_option};
use crate::bot::embeds;
use crate::error::{AppError, DomainError};
use crate::service::moderation::{parse_duration, ModerationService, MAX_BAN_MINUTES};
use crate::state::BotState;

pub fn register() -> CreateCommand {
    CreateCommand::new("ban")
        .description("Ban a member")
        .name_localized("ru", "бан")
        .name_localized("uk", "бан")
        .description_localized("ru", "Забанить участника")
        .description_localized("uk", "Забанити учасника")
        .default_member_permissions(Permissions::BAN_MEMBERS)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "add", "Ban a member")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Member to ban")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "reason", "Ban reason")
                        .required(true),
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "duration",
                    "Duration like 30m, 2h, 3d, 1w; omit for permanent",
                )),
        )
}

pub async fn run(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    let options = command.data.options();
    let Some(("add", opts)) = subcommand(&options) else {
        return Ok(());
    };
    let target = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;
    let reason = str_option(opts, "reason").ok_or(DomainError::MemberNotFound)?;

    if target.bot || target.id == command.user.id {
        let embed = embeds::info(state, locale, "errors.invalid_target", &[]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let duration = match str_option(opts, "duration") {
        Some(input) => Some(parse_duration(input, MAX_BAN_MINUTES)?),
        None => None,
    };

    let Some(db) = state.gateway.connection().await else {
        return reply_key(state, ctx, command, locale, "errors.database_offline", &[]).await;
    };

    command
        .guild_id
        .ok_or(DomainError::MemberNotFound)?
        .ban_with_reason(&ctx.http, target.id, 0, reason)
        .await?;

    ModerationService::new(&db)
        .add_ban(
            guild_id,
            target.id.get() as i64,
            command.user.id.get() as i64,
            reason,
            duration,
        )
        .await?;

    let until = match duration {
        Some(d) => {
            let ts = (chrono::Utc::now() + d).timestamp();
            format!("<t:{ts}:R>")
        }
        None => state.locales.get("moderation.ban.permanent", locale, &[]),
    };

    reply_key(
        state,
        ctx,
        command,
        locale,
        "moderation.ban.done",
        &[&format!("<@{}>", target.id.get()), reason, &until],
    )
    .await
}
