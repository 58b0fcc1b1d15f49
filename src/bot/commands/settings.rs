//! `/settings`: the guided per-guild configuration dialog.
//!
//! One root select leads into module subviews; every subview has a back
//! button popping the dialog stack. The wipe path goes through a modal
//! that must repeat the locale-provided confirmation phrase verbatim.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use serenity::all::{
    ActionRowComponent, ButtonStyle, ChannelType, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, Context, CreateActionRow, CreateButton, CreateCommand,
    CreateEmbed, CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateModal, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
    EditInteractionResponse, InputTextStyle, Permissions,
};
use serenity::collector::{ComponentInteractionCollector, ModalInteractionCollector};
use serenity::futures::StreamExt;

use crate::bot::commands::reply_key;
use crate::bot::embeds;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::AppError;
use crate::service::banner::{self, BANNER_STYLES};
use crate::service::settings::SettingsService;
use crate::state::BotState;
use crate::view::settings::{wipe_confirmed, BannerPageView, SettingsDialog, SettingsPage};
use crate::view::DIALOG_TIMEOUT_SECS;

/// Commands whose role allow-list can be overridden per guild.
const OVERRIDABLE_COMMANDS: [&str; 10] = [
    "money",
    "economy",
    "cards",
    "game",
    "rank",
    "roleplay",
    "ban",
    "clear",
    "role",
    "warnings",
];

pub fn register() -> CreateCommand {
    CreateCommand::new("settings")
        .description("Configure the bot for this guild")
        .name_localized("ru", "настройки")
        .name_localized("uk", "налаштування")
        .description_localized("ru", "Настроить бота для этого сервера")
        .description_localized("uk", "Налаштувати бота для цього сервера")
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

pub async fn run(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: i64,
    locale: &'static str,
) -> Result<(), AppError> {
    let Some(db) = state.gateway.connection().await else {
        return reply_key(state, ctx, command, locale, "errors.database_offline", &[]).await;
    };

    let mut dialog = SettingsDialog::new();
    let mut banner_view: Option<BannerPageView> = None;
    let mut perm_command: Option<String> = None;

    let (embed, components) = root_page(state, ctx, command, &db, guild_id, locale).await?;
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(components)
                    .ephemeral(true),
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
        let custom_id = press.data.custom_id.clone();
        match custom_id.as_str() {
            "settings:module" => {
                let picked = select_value(&press);
                let page = match picked.as_deref() {
                    Some("economy") => SettingsPage::Economy,
                    Some("levels") => SettingsPage::Levels,
                    Some("channels") => SettingsPage::Channels,
                    Some("permissions") => SettingsPage::Permissions,
                    Some("banner") => SettingsPage::Banner,
                    _ => continue,
                };
                dialog.enter(page);
                if page == SettingsPage::Banner {
                    let style = GuildSettingsRepository::new(&db)
                        .get_or_create(guild_id)
                        .await?
                        .banner_style;
                    banner_view = Some(BannerPageView::new(style));
                }
            }
            "settings:back" => {
                dialog.back();
                banner_view = None;
                perm_command = None;
            }
            "settings:economy:toggle" => {
                let repo = GuildSettingsRepository::new(&db);
                let current = repo.get_or_create(guild_id).await?;
                repo.set_economy(guild_id, !current.economy_on).await?;
            }
            "settings:levels:toggle" => {
                let repo = GuildSettingsRepository::new(&db);
                let current = repo.get_or_create(guild_id).await?;
                repo.set_levels(guild_id, !current.levels_on).await?;
            }
            "settings:channels:reports" | "settings:channels:logs" => {
                let picked = channel_value(&press);
                let repo = GuildSettingsRepository::new(&db);
                let current = repo.get_or_create(guild_id).await?;
                let (reports, logs) = if custom_id.ends_with("reports") {
                    (picked, current.logs_channel_id)
                } else {
                    (current.reports_channel_id, picked)
                };
                repo.set_channels(guild_id, reports, logs).await?;
            }
            "settings:perm:command" => {
                perm_command = select_value(&press);
            }
            "settings:perm:roles" => {
                if let Some(cmd) = perm_command.as_deref() {
                    let roles = role_values(&press);
                    GuildSettingsRepository::new(&db)
                        .set_permission_override(guild_id, cmd, &roles)
                        .await?;
                }
            }
            "settings:banner:prev" => {
                if let Some(view) = banner_view.as_mut() {
                    view.prev();
                }
            }
            "settings:banner:next" => {
                if let Some(view) = banner_view.as_mut() {
                    view.next();
                }
            }
            "settings:banner:set" => {
                if let Some(view) = banner_view.as_mut() {
                    let boosts = guild_boosts(ctx, command);
                    let style = view.style_on_page().to_string();
                    match SettingsService::new(&db)
                        .set_banner_style(guild_id, &style, boosts)
                        .await
                    {
                        Ok(()) => view.style_changed(Some(style)),
                        Err(e) => match e.as_domain() {
                            Some(domain) => {
                                let embed = embeds::error(state, locale, domain);
                                press
                                    .create_response(
                                        &ctx.http,
                                        CreateInteractionResponse::Message(
                                            CreateInteractionResponseMessage::new()
                                                .embed(embed)
                                                .ephemeral(true),
                                        ),
                                    )
                                    .await?;
                                continue;
                            }
                            None => return Err(e),
                        },
                    }
                }
            }
            "settings:banner:disable" => {
                if let Some(view) = banner_view.as_mut() {
                    let boosts = guild_boosts(ctx, command);
                    match SettingsService::new(&db).disable_banner(guild_id, boosts).await {
                        Ok(()) => view.style_changed(None),
                        Err(e) => match e.as_domain() {
                            Some(domain) => {
                                let embed = embeds::error(state, locale, domain);
                                press
                                    .create_response(
                                        &ctx.http,
                                        CreateInteractionResponse::Message(
                                            CreateInteractionResponseMessage::new()
                                                .embed(embed)
                                                .ephemeral(true),
                                        ),
                                    )
                                    .await?;
                                continue;
                            }
                            None => return Err(e),
                        },
                    }
                }
            }
            "settings:wipe" => {
                let modal_id = format!("settings:wipe:{}", press.id.get());
                let phrase = state.locales.get("settings.wipe.phrase", locale, &[]);
                let input = CreateInputText::new(
                    InputTextStyle::Short,
                    state.locales.get("settings.wipe.prompt", locale, &[&phrase]),
                    "phrase",
                )
                .required(true);
                press
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::Modal(
                            CreateModal::new(
                                modal_id.clone(),
                                state.locales.get("settings.wipe.title", locale, &[]),
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

                let entered = modal
                    .data
                    .components
                    .iter()
                    .flat_map(|row| row.components.iter())
                    .find_map(|c| match c {
                        ActionRowComponent::InputText(t) => t.value.clone(),
                        _ => None,
                    })
                    .unwrap_or_default();

                let key = if wipe_confirmed(&entered, &phrase) {
                    SettingsService::new(&db).wipe_guild_data(guild_id).await?;
                    "settings.wipe.done"
                } else {
                    "settings.wipe.mismatch"
                };
                modal
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::UpdateMessage(
                            CreateInteractionResponseMessage::new()
                                .embed(embeds::info(state, locale, key, &[]))
                                .components(vec![]),
                        ),
                    )
                    .await?;
                return Ok(());
            }
            _ => continue,
        }

        let (embed, components) = match dialog.current() {
            SettingsPage::Root => root_page(state, ctx, command, &db, guild_id, locale).await?,
            SettingsPage::Economy | SettingsPage::Levels => {
                toggle_page(state, &db, guild_id, locale, dialog.current()).await?
            }
            SettingsPage::Channels => channels_page(state, &db, guild_id, locale).await?,
            SettingsPage::Permissions => permissions_page(state, locale, perm_command.as_deref()),
            SettingsPage::Banner => match banner_view.as_ref() {
                Some(view) => banner_page(state, locale, view),
                None => root_page(state, ctx, command, &db, guild_id, locale).await?,
            },
        };

        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(embed)
                        .components(components),
                ),
            )
            .await?;
    }

    if dialog.state_mut().finalize() {
        let _ = command
            .edit_response(&ctx.http, EditInteractionResponse::new().components(vec![]))
            .await;
    }
    Ok(())
}

fn select_value(press: &ComponentInteraction) -> Option<String> {
    match &press.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    }
}

fn channel_value(press: &ComponentInteraction) -> Option<i64> {
    match &press.data.kind {
        ComponentInteractionDataKind::ChannelSelect { values } => {
            values.first().map(|id| id.get() as i64)
        }
        _ => None,
    }
}

fn role_values(press: &ComponentInteraction) -> Vec<u64> {
    match &press.data.kind {
        ComponentInteractionDataKind::RoleSelect { values } => {
            values.iter().map(|id| id.get()).collect()
        }
        _ => Vec::new(),
    }
}

fn guild_boosts(ctx: &Context, command: &CommandInteraction) -> u64 {
    command
        .guild_id
        .and_then(|g| ctx.cache.guild(g).map(|g| g.premium_subscription_count.unwrap_or(0)))
        .unwrap_or(0)
}

fn back_button(state: &BotState, locale: &str) -> CreateButton {
    CreateButton::new("settings:back")
        .label(state.locales.get("settings.back", locale, &[]))
        .style(ButtonStyle::Secondary)
}

fn on_off(state: &BotState, locale: &str, on: bool) -> String {
    let key = if on { "settings.on" } else { "settings.off" };
    state.locales.get(key, locale, &[])
}

async fn root_page(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &str,
) -> Result<(CreateEmbed, Vec<CreateActionRow>), AppError> {
    let settings = GuildSettingsRepository::new(db).get_or_create(guild_id).await?;

    let banner_state = settings
        .banner_style
        .as_deref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| on_off(state, locale, false));
    let embed = embeds::info(
        state,
        locale,
        "settings.root",
        &[
            &on_off(state, locale, settings.economy_on),
            &on_off(state, locale, settings.levels_on),
            &banner_state,
            &guild_boosts(ctx, command).to_string(),
        ],
    );

    let option = |value: &str, key: &str| {
        CreateSelectMenuOption::new(state.locales.get(key, locale, &[]), value)
    };
    let select = CreateSelectMenu::new(
        "settings:module",
        CreateSelectMenuKind::String {
            options: vec![
                option("economy", "settings.module.economy"),
                option("levels", "settings.module.levels"),
                option("channels", "settings.module.channels"),
                option("permissions", "settings.module.permissions"),
                option("banner", "settings.module.banner"),
            ],
        },
    );
    let wipe = CreateButton::new("settings:wipe")
        .label(state.locales.get("settings.wipe.button", locale, &[]))
        .style(ButtonStyle::Danger);

    Ok((
        embed,
        vec![
            CreateActionRow::SelectMenu(select),
            CreateActionRow::Buttons(vec![wipe]),
        ],
    ))
}

async fn toggle_page(
    state: &BotState,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &str,
    page: SettingsPage,
) -> Result<(CreateEmbed, Vec<CreateActionRow>), AppError> {
    let settings = GuildSettingsRepository::new(db).get_or_create(guild_id).await?;
    let (key, on, toggle_id) = match page {
        SettingsPage::Levels => ("settings.levels", settings.levels_on, "settings:levels:toggle"),
        _ => ("settings.economy", settings.economy_on, "settings:economy:toggle"),
    };

    let embed = embeds::info(state, locale, key, &[&on_off(state, locale, on)]);
    let toggle = CreateButton::new(toggle_id)
        .label(on_off(state, locale, !on))
        .style(if on { ButtonStyle::Danger } else { ButtonStyle::Success });

    Ok((
        embed,
        vec![CreateActionRow::Buttons(vec![toggle, back_button(state, locale)])],
    ))
}

async fn channels_page(
    state: &BotState,
    db: &DatabaseConnection,
    guild_id: i64,
    locale: &str,
) -> Result<(CreateEmbed, Vec<CreateActionRow>), AppError> {
    let settings = GuildSettingsRepository::new(db).get_or_create(guild_id).await?;
    let show = |id: Option<i64>| match id {
        Some(id) => format!("<#{id}>"),
        None => on_off(state, locale, false),
    };

    let embed = embeds::info(
        state,
        locale,
        "settings.channels",
        &[&show(settings.reports_channel_id), &show(settings.logs_channel_id)],
    );

    let channel_select = |custom_id: &str| {
        CreateActionRow::SelectMenu(CreateSelectMenu::new(
            custom_id,
            CreateSelectMenuKind::Channel {
                channel_types: Some(vec![ChannelType::Text]),
                default_channels: None,
            },
        ))
    };

    Ok((
        embed,
        vec![
            channel_select("settings:channels:reports"),
            channel_select("settings:channels:logs"),
            CreateActionRow::Buttons(vec![back_button(state, locale)]),
        ],
    ))
}

fn permissions_page(
    state: &BotState,
    locale: &str,
    chosen: Option<&str>,
) -> (CreateEmbed, Vec<CreateActionRow>) {
    let shown = chosen.unwrap_or("-");
    let embed = embeds::info(state, locale, "settings.permissions", &[shown]);

    let commands = CreateSelectMenu::new(
        "settings:perm:command",
        CreateSelectMenuKind::String {
            options: OVERRIDABLE_COMMANDS
                .iter()
                .map(|name| CreateSelectMenuOption::new(*name, *name))
                .collect(),
        },
    );

    let mut rows = vec![CreateActionRow::SelectMenu(commands)];
    if chosen.is_some() {
        // Empty selection clears the override.
        rows.push(CreateActionRow::SelectMenu(
            CreateSelectMenu::new(
                "settings:perm:roles",
                CreateSelectMenuKind::Role { default_roles: None },
            )
            .min_values(0)
            .max_values(10),
        ));
    }
    rows.push(CreateActionRow::Buttons(vec![back_button(state, locale)]));

    (embed, rows)
}

fn banner_page(
    state: &BotState,
    locale: &str,
    view: &BannerPageView,
) -> (CreateEmbed, Vec<CreateActionRow>) {
    let embed = embeds::info(
        state,
        locale,
        "settings.banner",
        &[
            view.style_on_page(),
            &(view.page() + 1).to_string(),
            &BANNER_STYLES.len().to_string(),
            &banner::MIN_BOOSTS.to_string(),
        ],
    );

    let rows = vec![CreateActionRow::Buttons(vec![
        CreateButton::new("settings:banner:prev")
            .label("◀")
            .style(ButtonStyle::Secondary),
        CreateButton::new("settings:banner:next")
            .label("▶")
            .style(ButtonStyle::Secondary),
        CreateButton::new("settings:banner:set")
            .label(state.locales.get("settings.banner.set", locale, &[]))
            .style(ButtonStyle::Success)
            .disabled(view.set_disabled()),
        CreateButton::new("settings:banner:disable")
            .label(state.locales.get("settings.banner.disable", locale, &[]))
            .style(ButtonStyle::Danger)
            .disabled(view.disable_disabled()),
        back_button(state, locale),
    ])];

    (embed, rows)
}
