//! `/economy transactions|profile|pay|shop|sell`.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use serenity::all::{
    ButtonStyle, CommandInteraction, CommandOptionType, Context, CreateActionRow, CreateButton,
    CreateCommand, CreateCommandOption, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::collector::ComponentInteractionCollector;
use serenity::futures::StreamExt;

use crate::bot::commands::{int_option, reply_embed, reply_key, str_option, subcommand, user_option};
use crate::bot::embeds;
use crate::data::economy::{direction, BalanceRepository, TransactionRepository};
use crate::data::pet::PetRepository;
use crate::error::{AppError, DomainError};
use crate::render::recipe;
use crate::service::economy::{format_amount, pet_price, EconomyService, SHOP_PETS};
use crate::state::BotState;
use crate::view::paginator::Paginator;
use crate::view::DIALOG_TIMEOUT_SECS;

pub fn register() -> CreateCommand {
    let mut shop_kind =
        CreateCommandOption::new(CommandOptionType::String, "kind", "Pet kind").required(true);
    for (kind, _) in SHOP_PETS {
        shop_kind = shop_kind.add_string_choice(kind, kind);
    }

    CreateCommand::new("economy")
        .description("Currency, history, and the shop")
        .name_localized("ru", "экономика")
        .name_localized("uk", "економіка")
        .description_localized("ru", "Валюта, история и магазин")
        .description_localized("uk", "Валюта, історія та магазин")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "transactions",
                "Transaction history",
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::User,
                "member",
                "Member, defaults to you",
            )),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "profile", "Economy profile")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member, defaults to you",
                )),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "pay", "Transfer currency")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Recipient")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "amount", "Amount")
                        .min_int_value(1)
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "shop", "Buy a pet")
                .add_sub_option(shop_kind)
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "name", "Pet name")
                        .required(true),
                ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "sell",
            "Sell your pet back for half its price",
        ))
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
        "transactions" => transactions(state, ctx, command, &db, guild_id, locale, opts).await,
        "profile" => profile(state, ctx, command, &db, guild_id, locale, opts).await,
        "pay" => pay(state, ctx, command, &db, guild_id, locale, opts).await,
        "shop" => shop(state, ctx, command, &db, guild_id, locale, opts).await,
        "sell" => sell(state, ctx, command, &db, guild_id, locale).await,
        _ => Ok(()),
    }
}

async fn transactions(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let target = user_option(opts, "member").unwrap_or(&command.user);
    let user_id = target.id.get() as i64;

    let repo = TransactionRepository::new(db);
    let (rows, total_pages) = repo.list_page(guild_id, user_id, 0).await?;

    if rows.is_empty() {
        let embed = embeds::info(state, locale, "economy.transactions.empty", &[]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let mut pager = Paginator::new(total_pages as usize);
    let embed = history_embed(state, locale, target.name.as_str(), &rows, &pager);

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(vec![nav_row("txns", &pager, false)]),
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
            "txns:prev" => pager.prev(),
            "txns:next" => pager.next(),
            _ => continue,
        }

        let (rows, total_pages) = repo.list_page(guild_id, user_id, pager.page() as u64).await?;
        pager.set_total_pages(total_pages as usize);
        let embed = history_embed(state, locale, target.name.as_str(), &rows, &pager);

        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(embed)
                        .components(vec![nav_row("txns", &pager, false)]),
                ),
            )
            .await?;
    }

    // Timeout: disable navigation in place.
    let _ = command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new().components(vec![nav_row("txns", &pager, true)]),
        )
        .await;
    Ok(())
}

fn history_embed(
    state: &BotState,
    locale: &str,
    member_name: &str,
    rows: &[entity::transaction::Model],
    pager: &Paginator,
) -> CreateEmbed {
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let sign = if row.kind == direction::INCOMING { "+" } else { "-" };
            format!(
                "`{}{}` {} — <t:{}:R>",
                sign,
                format_amount(row.amount),
                state.locales.get(&row.locale_key, locale, &[]),
                row.created_at.timestamp(),
            )
        })
        .collect();

    embeds::titled(state, locale, "economy.transactions.title", &[member_name]).description(
        format!(
            "{}\n\n{}",
            lines.join("\n"),
            state.locales.get(
                "common.page",
                locale,
                &[&(pager.page() + 1).to_string(), &pager.total_pages().to_string()],
            ),
        ),
    )
}

/// Previous/next button row shared by the paginated embeds.
pub(crate) fn nav_row(prefix: &str, pager: &Paginator, force_disabled: bool) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(format!("{prefix}:prev"))
            .label("◀")
            .style(ButtonStyle::Secondary)
            .disabled(force_disabled || pager.prev_disabled()),
        CreateButton::new(format!("{prefix}:next"))
            .label("▶")
            .style(ButtonStyle::Secondary)
            .disabled(force_disabled || pager.next_disabled()),
    ])
}

async fn profile(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let target = user_option(opts, "member").unwrap_or(&command.user);
    let amount = BalanceRepository::new(db)
        .amount(guild_id, target.id.get() as i64)
        .await?;

    if !state.render.get_status().await {
        // Degrade to a plain embed when the render service is down.
        return reply_key(
            state,
            ctx,
            command,
            locale,
            "economy.profile.plain",
            &[&format!("<@{}>", target.id.get()), &format_amount(amount)],
        )
        .await;
    }

    command.defer(&ctx.http).await?;
    let image = state
        .render
        .draw(
            recipe::ECONOMY_PROFILE,
            &[
                ("locale", locale),
                ("member_name", &target.name),
                ("member_avatar", &target.face()),
                ("balance", &format_amount(amount)),
            ],
        )
        .await?;

    command
        .create_followup(
            &ctx.http,
            serenity::all::CreateInteractionResponseFollowup::new()
                .add_file(serenity::all::CreateAttachment::bytes(image, "profile.png")),
        )
        .await?;
    Ok(())
}

async fn pay(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let target = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;
    let amount = int_option(opts, "amount").ok_or(DomainError::MemberNotFound)?;

    if target.bot || target.id == command.user.id {
        let embed = embeds::info(state, locale, "errors.invalid_target", &[]);
        return reply_embed(ctx, command, embed, true).await;
    }

    state
        .transfer_limiter
        .try_acquire(guild_id, command.user.id.get() as i64)?;

    EconomyService::new(db)
        .pay(
            guild_id,
            command.user.id.get() as i64,
            target.id.get() as i64,
            amount,
        )
        .await?;

    reply_key(
        state,
        ctx,
        command,
        locale,
        "economy.pay.done",
        &[
            &format!("<@{}>", command.user.id.get()),
            &format!("<@{}>", target.id.get()),
            &format_amount(amount),
        ],
    )
    .await
}

async fn shop(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
    opts: &[serenity::all::ResolvedOption<'_>],
) -> Result<(), AppError> {
    let kind = str_option(opts, "kind").ok_or(DomainError::MemberNotFound)?;
    let name = str_option(opts, "name").ok_or(DomainError::MemberNotFound)?;
    let user_id = command.user.id.get() as i64;

    let price =
        pet_price(kind).ok_or_else(|| AppError::InternalError(format!("unknown pet kind {kind}")))?;

    let pets = PetRepository::new(db);
    if pets.find(guild_id, user_id).await?.is_some() {
        return Err(DomainError::AlreadyHavePet.into());
    }

    EconomyService::new(db)
        .remove(guild_id, user_id, price, "transactions.shop_pet")
        .await?;
    pets.insert(guild_id, user_id, name, kind).await?;

    reply_key(
        state,
        ctx,
        command,
        locale,
        "economy.shop.bought",
        &[name, kind, &format_amount(price)],
    )
    .await
}

async fn sell(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    let (pet, refund) = EconomyService::new(db)
        .sell_pet(guild_id, command.user.id.get() as i64)
        .await?;

    reply_key(
        state,
        ctx,
        command,
        locale,
        "economy.shop.sold",
        &[&pet.name, &format_amount(refund)],
    )
    .await
}
