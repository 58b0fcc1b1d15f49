//! `/clear`: bulk message deletion with count and age bounds.

use chrono::{Duration, Utc};
use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption, GetMessages,
    Permissions,
};

use crate::bot::commands::{int_option, reply_key, user_option};
use crate::error::{AppError, DomainError};
use crate::service::moderation::validate_clear;
use crate::state::BotState;

pub fn register() -> CreateCommand {
    CreateCommand::new("clear")
        .description("Delete recent messages in this channel")
        .name_localized("ru", "очистить")
        .name_localized("uk", "очистити")
        .description_localized("ru", "Удалить последние сообщения в этом канале")
        .description_localized("uk", "Видалити останні повідомлення в цьому каналі")
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "count", "How many, 2 to 100")
                .min_int_value(2)
                .max_int_value(100)
                .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "days", "Only this many days back, 1 to 14")
                .min_int_value(1)
                .max_int_value(14),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::User,
            "member",
            "Only messages by this member",
        ))
}

pub async fn run(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    locale: &'static str,
) -> Result<(), AppError> {
    let options = command.data.options();
    let count = int_option(&options, "count").ok_or_else(|| {
        AppError::from(DomainError::ClearOutOfRange { count: 0, days: 0 })
    })? as u8;
    let days = int_option(&options, "days").unwrap_or(14) as u8;
    let author = user_option(&options, "member");

    validate_clear(count, days)?;

    let cutoff = Utc::now() - Duration::days(days as i64);
    let fetched = command
        .channel_id
        .messages(&ctx.http, GetMessages::new().limit(100))
        .await?;

    let ids: Vec<_> = fetched
        .iter()
        .filter(|m| m.timestamp.unix_timestamp() >= cutoff.timestamp())
        .filter(|m| author.is_none_or(|a| m.author.id == a.id))
        .take(count as usize)
        .map(|m| m.id)
        .collect();

    if ids.is_empty() {
        return reply_key(state, ctx, command, locale, "moderation.clear.nothing", &[]).await;
    }

    let deleted = ids.len();
    // Bulk delete needs at least two ids.
    if deleted == 1 {
        command.channel_id.delete_message(&ctx.http, ids[0]).await?;
    } else {
        command.channel_id.delete_messages(&ctx.http, ids).await?;
    }

    reply_key(
        state,
        ctx,
        command,
        locale,
        "moderation.clear.done",
        &[&deleted.to_string()],
    )
    .await
}
