//! `/moderation stats`: punishment counters for one member.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption, Permissions,
};

use crate::bot::commands::{reply_embed, reply_key, subcommand, user_option};
use crate::bot::embeds;
use crate::data::moderation::ModerationStatRepository;
use crate::error::AppError;
use crate::state::BotState;

pub fn register() -> CreateCommand {
    CreateCommand::new("moderation")
        .description("Moderation statistics")
        .name_localized("ru", "модерация")
        .name_localized("uk", "модерація")
        .description_localized("ru", "Статистика модерации")
        .description_localized("uk", "Статистика модерації")
        .default_member_permissions(Permissions::MODERATE_MEMBERS)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "stats", "Punishment counters")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member, defaults to you",
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
    let Some((sub, opts)) = subcommand(&options) else {
        return Ok(());
    };
    if sub != "stats" {
        return Ok(());
    }

    let Some(db) = state.gateway.connection().await else {
        return reply_key(state, ctx, command, locale, "errors.database_offline", &[]).await;
    };

    let target = user_option(opts, "member").unwrap_or(&command.user);
    let rows = ModerationStatRepository::new(&db)
        .stats_for(guild_id, target.id.get() as i64)
        .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for row in &rows {
        lines.push(state.locales.get(
            &format!("moderation.stats.{}", row.punishment_kind),
            locale,
            &[&row.given_count.to_string(), &row.received_count.to_string()],
        ));
    }
    if lines.is_empty() {
        lines.push(state.locales.get("moderation.stats.empty", locale, &[]));
    }

    let embed = embeds::titled(state, locale, "moderation.stats.title", &[&target.name])
        .description(lines.join("\n"))
        .thumbnail(target.face());
    reply_embed(ctx, command, embed, false).await
}
