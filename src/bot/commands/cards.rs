//! `/cards roll|list|trade`.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use serenity::all::{
    ActionRowComponent, ButtonStyle, CommandInteraction, CommandOptionType, Context,
    CreateActionRow, CreateButton, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
    CreateModal, EditInteractionResponse, EditMessage, InputTextStyle, ModalInteraction, User,
};
use serenity::collector::{ComponentInteractionCollector, ModalInteractionCollector};
use serenity::futures::StreamExt;

use crate::bot::commands::{
    ensure_not_in_game, int_option, reply_embed, reply_key, str_option, subcommand, user_option,
};
use crate::bot::embeds;
use crate::cards;
use crate::data::cards::{CardInstanceRepository, InventorySort};
use crate::data::economy::InGameRepository;
use crate::error::{AppError, DomainError};
use crate::service::cards::{roll_candidates, CardService, RollCandidate};
use crate::service::trade::TradeService;
use crate::state::BotState;
use crate::view::roll::{RollDialog, ROLL_TIMEOUT_SECS};
use crate::view::trade::{TradeButton, TradeOfferView};
use crate::view::DIALOG_TIMEOUT_SECS;

pub fn register() -> CreateCommand {
    CreateCommand::new("cards")
        .description("Card collection")
        .name_localized("ru", "карты")
        .name_localized("uk", "карти")
        .description_localized("ru", "Коллекция карт")
        .description_localized("uk", "Колекція карт")
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "roll",
            "Roll three candidates and keep one",
        ))
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "list", "Browse an inventory")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member, defaults to you",
                ))
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "sort", "Sort order")
                        .add_string_choice("newest first", "date")
                        .add_string_choice("by rarity", "rarity")
                        .add_string_choice("uid ascending", "uid_asc")
                        .add_string_choice("uid descending", "uid_desc"),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "trade", "Offer a card trade")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "own", "Uid of your card")
                        .min_int_value(1)
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Trade partner")
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

    match sub {
        "roll" => roll(state, ctx, command, &db, guild_id, locale).await,
        "list" => list(state, ctx, command, &db, locale, opts).await,
        "trade" => trade(state, ctx, command, &db, guild_id, locale, opts).await,
        _ => Ok(()),
    }
}

async fn roll(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    let user_id = command.user.id.get() as i64;
    ensure_not_in_game(db, guild_id, user_id).await?;

    let flags = InGameRepository::new(db);
    flags.set(guild_id, user_id, true).await?;
    let outcome = roll_dialog(state, ctx, command, db, locale).await;
    flags.set(guild_id, user_id, false).await?;
    outcome
}

async fn roll_dialog(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    locale: &'static str,
) -> Result<(), AppError> {
    let candidates = roll_candidates(&mut rand::rng());
    let mut dialog = RollDialog::new(candidates);

    let lines: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(ix, c)| format!("{}. {}", ix + 1, candidate_line(state, locale, c)))
        .collect();
    let embed = embeds::titled(state, locale, "cards.roll.title", &[])
        .description(lines.join("\n"));

    let buttons = CreateActionRow::Buttons(
        (0..3)
            .map(|ix| {
                CreateButton::new(format!("roll:{ix}"))
                    .label((ix + 1).to_string())
                    .style(ButtonStyle::Primary)
            })
            .collect(),
    );

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![buttons]),
            ),
        )
        .await?;

    let message = command.get_response(&ctx.http).await?;
    let press = ComponentInteractionCollector::new(&ctx.shard)
        .message_id(message.id)
        .author_id(command.user.id)
        .timeout(Duration::from_secs(ROLL_TIMEOUT_SECS as u64))
        .await;

    let chosen = match &press {
        Some(press) => press
            .data
            .custom_id
            .strip_prefix("roll:")
            .and_then(|ix| ix.parse::<usize>().ok())
            .and_then(|ix| dialog.select(ix)),
        None => dialog.timeout(),
    };
    let Some(chosen) = chosen else {
        return Ok(());
    };

    let card = CardService::new(db).claim(chosen, command.user.id.get() as i64).await?;

    let claimed = embeds::info(
        state,
        locale,
        if press.is_some() { "cards.roll.claimed" } else { "cards.roll.auto_claimed" },
        &[&candidate_line(state, locale, &chosen), &card.uid.to_string()],
    );

    match press {
        Some(press) => {
            press
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new().embed(claimed).components(vec![]),
                    ),
                )
                .await?;
        }
        None => {
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().embed(claimed).components(vec![]),
                )
                .await?;
        }
    }
    Ok(())
}

fn candidate_line(state: &BotState, locale: &str, candidate: &RollCandidate) -> String {
    let name = state
        .locales
        .get(&format!("cards.{}.name", candidate.template.name_key), locale, &[]);
    let rarity = state
        .locales
        .get(&format!("cards.rarity.{}", candidate.template.rarity), locale, &[]);
    format!("**{}** ({}) {}", name, rarity, "★".repeat(candidate.stars as usize))
}

async fn list(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let target = user_option(opts, "member").unwrap_or(&command.user);
    let sort = match str_option(opts, "sort") {
        Some("rarity") => InventorySort::ByRarityPriority,
        Some("uid_asc") => InventorySort::ByUidAsc,
        Some("uid_desc") => InventorySort::ByUidDesc,
        _ => InventorySort::ByDate,
    };

    let repo = CardInstanceRepository::new(db);
    let owner = target.id.get() as i64;
    let (rows, total_pages) = repo.list_owner_page(owner, sort, 0).await?;

    if rows.is_empty() {
        let embed = embeds::info(state, locale, "cards.list.empty", &[&target.name]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let mut pager = crate::view::paginator::Paginator::new(total_pages);
    let embed = inventory_embed(state, locale, target, &rows, &pager);

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![super::economy::nav_row("cards", &pager, false)]),
            ),
        )
        .await?;

    let message = command.get_response(&ctx.http).await?;
    let mut presses = ComponentInteractionCollector::new(&ctx.shard)
        .message_id(message.id)
        .author_id(command.user.id)
        .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
        .stream();

    while let Some(press) = presses.next().await {
        match press.data.custom_id.as_str() {
            "cards:prev" => pager.prev(),
            "cards:next" => pager.next(),
            _ => continue,
        }

        let (rows, total_pages) = repo.list_owner_page(owner, sort, pager.page()).await?;
        pager.set_total_pages(total_pages);
        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(inventory_embed(state, locale, target, &rows, &pager))
                        .components(vec![super::economy::nav_row("cards", &pager, false)]),
                ),
            )
            .await?;
    }

    let _ = command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .components(vec![super::economy::nav_row("cards", &pager, true)]),
        )
        .await;
    Ok(())
}

fn inventory_embed(
    state: &BotState,
    locale: &str,
    target: &User,
    rows: &[entity::card_instance::Model],
    pager: &crate::view::paginator::Paginator,
) -> CreateEmbed {
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let name = cards::template(row.card_id)
                .map(|t| state.locales.get(&format!("cards.{}.name", t.name_key), locale, &[]))
                .unwrap_or_else(|| format!("#{}", row.card_id));
            let rarity =
                state.locales.get(&format!("cards.rarity.{}", row.rarity), locale, &[]);
            format!("`{}` **{}** ({}) {}", row.uid, name, rarity, "★".repeat(row.stars_count as usize))
        })
        .collect();

    embeds::titled(state, locale, "cards.list.title", &[&target.name]).description(format!(
        "{}\n\n{}",
        lines.join("\n"),
        state.locales.get(
            "common.page",
            locale,
            &[&(pager.page() + 1).to_string(), &pager.total_pages().to_string()],
        ),
    ))
}

/// The trade offer dialog: drafting (modal) → pending confirm
/// (confirm/back, nothing persisted) → open (accept/decline/cancel).
///
/// The open offer is split across two surfaces so each party only sees
/// its own buttons: a channel message addressed to the offeree with
/// accept/decline, and the offerer's ephemeral control with cancel.
async fn trade(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let own_uid = int_option(opts, "own").ok_or(DomainError::MemberNotFound)?;
    let partner = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;

    if partner.bot || partner.id == command.user.id {
        let embed = embeds::info(state, locale, "errors.invalid_target", &[]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let offerer = command.user.id.get() as i64;
    let offeree = partner.id.get() as i64;
    let service = TradeService::new(db);

    let mut modal_id = format!("trade:draft:{}", command.id.get());
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Modal(draft_modal(state, locale, &modal_id)),
        )
        .await?;

    let mut first_draft = true;
    let (confirm, their_uid) = loop {
        let wanted = modal_id.clone();
        let Some(modal) = ModalInteractionCollector::new(&ctx.shard)
            .filter(move |m| m.data.custom_id == wanted)
            .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
            .await
        else {
            return Ok(());
        };

        let Some(their_uid) = modal_uid(&modal) else {
            let embed = embeds::info(state, locale, "cards.trade.bad_uid", &[]);
            modal
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new().embed(embed).ephemeral(true),
                    ),
                )
                .await?;
            return Ok(());
        };

        // Draft validation; the same checks run again on open.
        if let Err(e) = service.check_offer(guild_id, offerer, own_uid, offeree, their_uid).await {
            let Some(domain) = e.as_domain() else { return Err(e) };
            let embed = embeds::error(state, locale, domain);
            modal
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new().embed(embed).ephemeral(true),
                    ),
                )
                .await?;
            return Ok(());
        }

        let body = CreateInteractionResponseMessage::new()
            .embed(trade_embed(state, locale, db, offerer, own_uid, offeree, their_uid).await?)
            .components(vec![confirm_row(state, locale, false)])
            .ephemeral(true);
        // A modal opened from the back button updates the confirm message
        // it was opened from; the first draft has no message yet.
        let response = if first_draft {
            CreateInteractionResponse::Message(body)
        } else {
            CreateInteractionResponse::UpdateMessage(body)
        };
        modal.create_response(&ctx.http, response).await?;
        first_draft = false;
        let confirm_msg = modal.get_response(&ctx.http).await?;

        let Some(press) = ComponentInteractionCollector::new(&ctx.shard)
            .message_id(confirm_msg.id)
            .author_id(command.user.id)
            .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
            .await
        else {
            let _ = modal
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .components(vec![confirm_row(state, locale, true)]),
                )
                .await;
            return Ok(());
        };

        if press.data.custom_id == "trade:confirm" {
            break (press, their_uid);
        }
        // Back: re-enter the offeree card uid.
        modal_id = format!("trade:draft:{}", press.id.get());
        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Modal(draft_modal(state, locale, &modal_id)),
            )
            .await?;
    };

    let trade = match service.open(guild_id, offerer, own_uid, offeree, their_uid).await {
        Ok(trade) => trade,
        // The cards or participants may have been locked since the draft
        // check; revert to nothing persisted.
        Err(e) => {
            let Some(domain) = e.as_domain() else { return Err(e) };
            confirm
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new()
                            .embed(embeds::error(state, locale, domain))
                            .components(vec![]),
                    ),
                )
                .await?;
            return Ok(());
        }
    };
    let mut view = TradeOfferView::new(&trade);

    let offer = trade_embed(state, locale, db, offerer, own_uid, offeree, their_uid).await?;
    let mut offer_msg = command
        .channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .content(format!("<@{}>", partner.id.get()))
                .embed(offer.clone())
                .components(vec![trade_row(state, locale, &view, offeree, false)]),
        )
        .await?;

    confirm
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(offer)
                    .components(vec![trade_row(state, locale, &view, offerer, false)]),
            ),
        )
        .await?;

    let offer_id = offer_msg.id;
    let control_id = confirm.message.id;
    let mut presses = ComponentInteractionCollector::new(&ctx.shard)
        .filter(move |p| p.message.id == offer_id || p.message.id == control_id)
        .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
        .stream();

    while let Some(press) = presses.next().await {
        let button = match press.data.custom_id.as_str() {
            "trade:accept" => TradeButton::Accept,
            "trade:decline" => TradeButton::Decline,
            "trade:cancel" => TradeButton::Cancel,
            _ => continue,
        };

        if !view.can_press(press.user.id.get() as i64, button) {
            let _ = press.create_response(&ctx.http, CreateInteractionResponse::Acknowledge).await;
            continue;
        }

        // The counterparty may be looking elsewhere; tell them directly.
        let key = match button {
            TradeButton::Accept => {
                service.accept(trade.id).await?;
                let dm = embeds::info(
                    state,
                    locale,
                    "cards.trade.accepted_dm",
                    &[&own_uid.to_string(), &their_uid.to_string()],
                );
                dm_user(ctx, command.user.id, dm).await;
                "cards.trade.accepted"
            }
            TradeButton::Decline => {
                service.decline(trade.id).await?;
                let dm = embeds::info(
                    state,
                    locale,
                    "cards.trade.declined_dm",
                    &[&format!("<@{}>", offeree)],
                );
                dm_user(ctx, command.user.id, dm).await;
                "cards.trade.declined"
            }
            TradeButton::Cancel => {
                service.decline(trade.id).await?;
                let dm = embeds::info(
                    state,
                    locale,
                    "cards.trade.cancelled_dm",
                    &[&format!("<@{}>", offerer)],
                );
                dm_user(ctx, partner.id, dm).await;
                "cards.trade.cancelled"
            }
        };
        view.state_mut().finalize();

        let closed = embeds::info(state, locale, key, &[]);
        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(closed.clone())
                        .components(vec![]),
                ),
            )
            .await?;
        // Close out the surface the verdict did not come from.
        if press.message.id == offer_id {
            let _ = confirm
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().embed(closed).components(vec![]),
                )
                .await;
        } else {
            let _ = offer_msg
                .edit(&ctx.http, EditMessage::new().embed(closed).components(vec![]))
                .await;
        }
        return Ok(());
    }

    // Timeout with no verdict.
    if view.state_mut().finalize() {
        service.expire(trade.id).await?;
        let expired = embeds::info(state, locale, "cards.trade.expired", &[]);
        let _ = offer_msg
            .edit(&ctx.http, EditMessage::new().embed(expired.clone()).components(vec![]))
            .await;
        let _ = confirm
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new().embed(expired).components(vec![]),
            )
            .await;
    }
    Ok(())
}

fn draft_modal(state: &BotState, locale: &str, custom_id: &str) -> CreateModal {
    let input = CreateInputText::new(
        InputTextStyle::Short,
        state.locales.get("cards.trade.modal_uid", locale, &[]),
        "uid",
    )
    .required(true);
    CreateModal::new(custom_id, state.locales.get("cards.trade.modal_title", locale, &[]))
        .components(vec![CreateActionRow::InputText(input)])
}

fn modal_uid(modal: &ModalInteraction) -> Option<i64> {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|c| match c {
            ActionRowComponent::InputText(t) => t.value.as_deref(),
            _ => None,
        })
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|uid| *uid > 0)
}

async fn dm_user(ctx: &Context, user_id: serenity::all::UserId, embed: CreateEmbed) {
    if let Ok(channel) = user_id.create_dm_channel(&ctx.http).await {
        let _ = channel.send_message(&ctx.http, CreateMessage::new().embed(embed)).await;
    }
}

async fn trade_embed(
    state: &BotState,
    locale: &str,
    db: &DatabaseConnection,
    offerer_user_id: i64,
    offerer_uid: i64,
    offeree_user_id: i64,
    offeree_uid: i64,
) -> Result<CreateEmbed, AppError> {
    let repo = CardInstanceRepository::new(db);
    let describe = |card: Option<entity::card_instance::Model>| match card {
        Some(card) => {
            let name = cards::template(card.card_id)
                .map(|t| state.locales.get(&format!("cards.{}.name", t.name_key), locale, &[]))
                .unwrap_or_else(|| format!("#{}", card.card_id));
            format!("`{}` **{}** {}", card.uid, name, "★".repeat(card.stars_count as usize))
        }
        None => "?".to_string(),
    };

    let offered = describe(repo.find_by_uid(offerer_uid).await?);
    let wanted = describe(repo.find_by_uid(offeree_uid).await?);

    Ok(embeds::info(
        state,
        locale,
        "cards.trade.offer",
        &[
            &format!("<@{offerer_user_id}>"),
            &offered,
            &format!("<@{offeree_user_id}>"),
            &wanted,
        ],
    ))
}

/// Buttons the given participant is allowed to see, per
/// [`TradeOfferView::buttons_for`].
fn trade_row(
    state: &BotState,
    locale: &str,
    view: &TradeOfferView,
    viewer_user_id: i64,
    disabled: bool,
) -> CreateActionRow {
    let buttons = view
        .buttons_for(viewer_user_id)
        .into_iter()
        .map(|b| {
            let (id, style) = match b {
                TradeButton::Accept => ("trade:accept", ButtonStyle::Success),
                TradeButton::Decline => ("trade:decline", ButtonStyle::Danger),
                TradeButton::Cancel => ("trade:cancel", ButtonStyle::Secondary),
            };
            CreateButton::new(id)
                .label(state.locales.get(b.label_key(), locale, &[]))
                .style(style)
                .disabled(disabled)
        })
        .collect();
    CreateActionRow::Buttons(buttons)
}

fn confirm_row(state: &BotState, locale: &str, disabled: bool) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new("trade:confirm")
            .label(state.locales.get("cards.trade.confirm", locale, &[]))
            .style(ButtonStyle::Success)
            .disabled(disabled),
        CreateButton::new("trade:back")
            .label(state.locales.get("cards.trade.back", locale, &[]))
            .style(ButtonStyle::Secondary)
            .disabled(disabled),
    ])
}
