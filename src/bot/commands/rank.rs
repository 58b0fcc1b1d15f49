//! `/rank card|set`.

use std::time::Duration;

use serenity::all::{
    ButtonStyle, CommandInteraction, CommandOptionType, Context, CreateActionRow, CreateAttachment,
    CreateButton, CreateCommand, CreateCommandOption, CreateInteractionResponseFollowup,
    EditInteractionResponse, Permissions,
};
use serenity::collector::ComponentInteractionCollector;

use crate::bot::commands::{reply_embed, reply_key, str_option, subcommand, user_option};
use crate::bot::embeds;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::data::level::LevelRepository;
use crate::error::{AppError, DomainError};
use crate::render::recipe;
use crate::service::leveling::{can_prestige, LevelingService};
use crate::state::BotState;
use crate::view::DIALOG_TIMEOUT_SECS;

pub fn register() -> CreateCommand {
    CreateCommand::new("rank")
        .description("Levels and prestige")
        .name_localized("ru", "ранг")
        .name_localized("uk", "ранг")
        .description_localized("ru", "Уровни и престиж")
        .description_localized("uk", "Рівні та престиж")
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "card", "Show a rank card")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member, defaults to you",
                )),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "set",
                "Set the custom level-up embed for this guild",
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::String,
                "form",
                "Embed form as JSON; omit to reset to the default",
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

    let Some(db) = state.gateway.connection().await else {
        return reply_key(state, ctx, command, locale, "errors.database_offline", &[]).await;
    };

    match sub {
        "card" => {
            let target = user_option(opts, "member").unwrap_or(&command.user);
            let Some(row) = LevelRepository::new(&db)
                .find(guild_id, target.id.get() as i64)
                .await?
            else {
                let embed = embeds::info(state, locale, "levels.no_progress", &[&target.name]);
                return reply_embed(ctx, command, embed, true).await;
            };

            if !state.render.get_status().await {
                return Err(DomainError::RenderOffline.into());
            }

            command.defer(&ctx.http).await?;
            let image = state
                .render
                .draw(
                    recipe::LEVEL_CARD,
                    &[
                        ("locale", locale),
                        ("member_name", &target.name),
                        ("member_avatar", &target.face()),
                        ("level", &row.level.to_string()),
                        ("prestige", &row.prestige.to_string()),
                        ("exp_now", &row.exp_now.to_string()),
                        ("exp_need", &row.exp_need.to_string()),
                    ],
                )
                .await?;

            let mut followup = CreateInteractionResponseFollowup::new()
                .add_file(CreateAttachment::bytes(image, "rank.png"));

            // The prestige button only shows on the caller's own card in
            // the eligible state.
            let eligible = target.id == command.user.id && can_prestige(&row);
            if eligible {
                followup =
                    followup.components(vec![CreateActionRow::Buttons(vec![CreateButton::new(
                        "rank:prestige",
                    )
                    .label(state.locales.get("levels.prestige_button", locale, &[]))
                    .style(ButtonStyle::Primary)])]);
            }

            let message = command.create_followup(&ctx.http, followup).await?;
            if !eligible {
                return Ok(());
            }

            let press = ComponentInteractionCollector::new(&ctx.shard)
                .message_id(message.id)
                .author_id(command.user.id)
                .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
                .await;

            let Some(press) = press else {
                let _ = command
                    .edit_response(&ctx.http, EditInteractionResponse::new().components(vec![]))
                    .await;
                return Ok(());
            };

            match LevelingService::new(&db)
                .prestige(guild_id, command.user.id.get() as i64)
                .await?
            {
                Some(updated) => {
                    press
                        .create_response(
                            &ctx.http,
                            serenity::all::CreateInteractionResponse::UpdateMessage(
                                serenity::all::CreateInteractionResponseMessage::new()
                                    .embed(embeds::info(
                                        state,
                                        locale,
                                        "levels.prestige_done",
                                        &[
                                            &format!("<@{}>", command.user.id.get()),
                                            &updated.prestige.to_string(),
                                        ],
                                    ))
                                    .components(vec![]),
                            ),
                        )
                        .await?;
                }
                None => {
                    press
                        .create_response(
                            &ctx.http,
                            serenity::all::CreateInteractionResponse::UpdateMessage(
                                serenity::all::CreateInteractionResponseMessage::new()
                                    .embed(embeds::info(state, locale, "levels.prestige_gone", &[]))
                                    .components(vec![]),
                            ),
                        )
                        .await?;
                }
            }
            Ok(())
        }
        "set" => {
            if !command
                .member
                .as_ref()
                .and_then(|m| m.permissions)
                .map(|p| p.contains(Permissions::ADMINISTRATOR))
                .unwrap_or(false)
            {
                let embed = embeds::info(state, locale, "errors.admin_only", &[]);
                return reply_embed(ctx, command, embed, true).await;
            }

            let form = match str_option(opts, "form") {
                Some(raw) => Some(
                    serde_json::from_str::<serde_json::Value>(raw)
                        .map_err(|_| DomainError::DecodeJson)?,
                ),
                None => None,
            };
            let reset = form.is_none();

            GuildSettingsRepository::new(&db)
                .set_level_up_embed(guild_id, form)
                .await?;

            let key = if reset { "levels.embed_reset" } else { "levels.embed_set" };
            reply_key(state, ctx, command, locale, key, &[]).await
        }
        _ => Ok(()),
    }
}
