//! `/warnings warn|list`.
//!
//! The list view pages one warn at a time. Removal goes through a modal;
//! the case number is recovered from the embed currently on screen, so a
//! stale dialog can never delete a warn the moderator is not looking at.

use std::time::Duration;

use serenity::all::{
    ActionRowComponent, ButtonStyle, CommandInteraction, CommandOptionType, Context,
    CreateActionRow, CreateButton, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage, CreateModal,
    EditInteractionResponse, InputTextStyle, Permissions, User,
};
use serenity::collector::{ComponentInteractionCollector, ModalInteractionCollector};
use serenity::futures::StreamExt;

use crate::bot::commands::{reply_embed, reply_key, str_option, subcommand, user_option};
use crate::bot::embeds;
use crate::data::moderation::WarnRepository;
use crate::error::{AppError, DomainError};
use crate::service::moderation::ModerationService;
use crate::state::BotState;
use crate::view::paginator::Paginator;
use crate::view::warn::extract_case_number;
use crate::view::DIALOG_TIMEOUT_SECS;

pub fn register() -> CreateCommand {
    CreateCommand::new("warnings")
        .description("Warnings")
        .name_localized("ru", "предупреждения")
        .name_localized("uk", "попередження")
        .description_localized("ru", "Предупреждения")
        .description_localized("uk", "Попередження")
        .default_member_permissions(Permissions::MODERATE_MEMBERS)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "warn", "Warn a member")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Member to warn")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "reason", "Warn reason")
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "list", "Browse a member's warns")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Member")
                        .required(true),
                ),
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

    let target = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;

    match sub {
        "warn" => {
            let reason = str_option(opts, "reason").ok_or(DomainError::MemberNotFound)?;
            if target.bot {
                let embed = embeds::info(state, locale, "errors.invalid_target", &[]);
                return reply_embed(ctx, command, embed, true).await;
            }

            let warn = ModerationService::new(&db)
                .add_warn(
                    guild_id,
                    target.id.get() as i64,
                    command.user.id.get() as i64,
                    reason,
                )
                .await?;

            reply_key(
                state,
                ctx,
                command,
                locale,
                "moderation.warn.done",
                &[
                    &format!("<@{}>", target.id.get()),
                    &warn.case_number.to_string(),
                    reason,
                ],
            )
            .await
        }
        "list" => list(state, ctx, command, &db, guild_id, locale, target).await,
        _ => Ok(()),
    }
}

async fn list(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &sea_orm::DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    target: &User,
) -> Result<(), AppError> {
    let repo = WarnRepository::new(db);
    let warns = repo.list_for_user(guild_id, target.id.get() as i64).await?;
    if warns.is_empty() {
        let embed = embeds::info(state, locale, "moderation.warn.none", &[&target.name]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let mut pager = Paginator::new(warns.len());
    let embed = warn_embed(state, locale, target, &warns[pager.page()], &pager);

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![buttons(state, locale, &pager, false)]),
            ),
        )
        .await?;

    let message = command.get_response(&ctx.http).await?;
    let mut presses = ComponentInteractionCollector::new(&ctx.shard)
        .message_id(message.id)
        .author_id(command.user.id)
        .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
        .stream();

    let mut warns = warns;
    while let Some(press) = presses.next().await {
        match press.data.custom_id.as_str() {
            "warns:prev" => pager.prev(),
            "warns:next" => pager.next(),
            "warns:remove" => {
                let shown = press
                    .message
                    .embeds
                    .first()
                    .and_then(|e| e.description.as_deref())
                    .and_then(extract_case_number);

                let modal_id = format!("warns:modal:{}", press.id.get());
                let input = CreateInputText::new(
                    InputTextStyle::Short,
                    state.locales.get("moderation.warn.remove_reason", locale, &[]),
                    "reason",
                )
                .required(false);
                press
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::Modal(
                            CreateModal::new(
                                modal_id.clone(),
                                state.locales.get("moderation.warn.remove_title", locale, &[]),
                            )
                            .components(vec![CreateActionRow::InputText(input)]),
                        ),
                    )
                    .await?;

                let submitted = ModalInteractionCollector::new(&ctx.shard)
                    .filter(move |m| m.data.custom_id == modal_id)
                    .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
                    .await;

                let Some(modal) = submitted else { continue };
                let reason = modal
                    .data
                    .components
                    .iter()
                    .flat_map(|row| row.components.iter())
                    .find_map(|c| match c {
                        ActionRowComponent::InputText(t) => t.value.clone(),
                        _ => None,
                    })
                    .unwrap_or_default();

                let removed = match shown {
                    Some(case_number) => {
                        let removed =
                            ModerationService::new(db).remove_warn(guild_id, case_number).await?;
                        if removed {
                            state.stats.log_event(format!(
                                "warn case {case_number} removed by {}: {reason}",
                                command.user.id.get()
                            ));
                        }
                        removed
                    }
                    None => false,
                };

                if removed {
                    warns = repo.list_for_user(guild_id, target.id.get() as i64).await?;
                    pager.set_total_pages(warns.len().max(1));
                }

                let response = if warns.is_empty() {
                    CreateInteractionResponseMessage::new()
                        .embed(embeds::info(state, locale, "moderation.warn.none", &[&target.name]))
                        .components(vec![])
                } else {
                    CreateInteractionResponseMessage::new()
                        .embed(warn_embed(state, locale, target, &warns[pager.page()], &pager))
                        .components(vec![buttons(state, locale, &pager, false)])
                };
                modal
                    .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(response))
                    .await?;
                if warns.is_empty() {
                    return Ok(());
                }
                continue;
            }
            _ => continue,
        }

        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(warn_embed(state, locale, target, &warns[pager.page()], &pager))
                        .components(vec![buttons(state, locale, &pager, false)]),
                ),
            )
            .await?;
    }

    let _ = command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new().components(vec![buttons(state, locale, &pager, true)]),
        )
        .await;
    Ok(())
}

fn warn_embed(
    state: &BotState,
    locale: &str,
    target: &User,
    warn: &entity::warn::Model,
    pager: &Paginator,
) -> CreateEmbed {
    embeds::titled(state, locale, "moderation.warn.title", &[&target.name])
        .description(state.locales.get(
            "moderation.warn.entry",
            locale,
            &[
                &warn.case_number.to_string(),
                &warn.reason,
                &format!("<@{}>", warn.moderator_id),
                &format!("<t:{}:R>", warn.issued_at.timestamp()),
            ],
        ))
        .footer(serenity::all::CreateEmbedFooter::new(state.locales.get(
            "common.page",
            locale,
            &[&(pager.page() + 1).to_string(), &pager.total_pages().to_string()],
        )))
}

fn buttons(
    state: &BotState,
    locale: &str,
    pager: &Paginator,
    force_disabled: bool,
) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new("warns:prev")
            .label("◀")
            .style(ButtonStyle::Secondary)
            .disabled(force_disabled || pager.prev_disabled()),
        CreateButton::new("warns:next")
            .label("▶")
            .style(ButtonStyle::Secondary)
            .disabled(force_disabled || pager.next_disabled()),
        CreateButton::new("warns:remove")
            .label(state.locales.get("moderation.warn.remove", locale, &[]))
            .style(ButtonStyle::Danger)
            .disabled(force_disabled),
    ])
}
