//! `/game tictactoe`: a two-player duel on button grid.
//!
//! Both players hold the in-game mutex for the whole board so neither
//! can open a card roll or a second duel mid-game.

use std::time::Duration;

use serenity::all::{
    ButtonStyle, CommandInteraction, CommandOptionType, Context, CreateActionRow, CreateButton,
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, UserId,
};
use serenity::collector::ComponentInteractionCollector;
use serenity::futures::StreamExt;

use crate::bot::commands::{ensure_not_in_game, reply_embed, reply_key, subcommand, user_option};
use crate::bot::embeds;
use crate::data::economy::InGameRepository;
use crate::error::{AppError, DomainError};
use crate::game::tictactoe::{Board, Sign};
use crate::state::BotState;
use crate::view::DIALOG_TIMEOUT_SECS;

pub fn register() -> CreateCommand {
    CreateCommand::new("game")
        .description("Games")
        .name_localized("ru", "игра")
        .name_localized("uk", "гра")
        .description_localized("ru", "Игры")
        .description_localized("uk", "Ігри")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "tictactoe",
                "Challenge a member to tic-tac-toe",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::User, "opponent", "Who to challenge")
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
    if sub != "tictactoe" {
        return Ok(());
    }

    let opponent = user_option(opts, "opponent").ok_or(DomainError::MemberNotFound)?;
    if opponent.bot || opponent.id == command.user.id {
        let embed = embeds::info(state, locale, "errors.invalid_target", &[]);
        return reply_embed(ctx, command, embed, true).await;
    }

    let Some(db) = state.gateway.connection().await else {
        return reply_key(state, ctx, command, locale, "errors.database_offline", &[]).await;
    };

    let challenger_id = command.user.id.get() as i64;
    let opponent_id = opponent.id.get() as i64;
    ensure_not_in_game(&db, guild_id, challenger_id).await?;
    ensure_not_in_game(&db, guild_id, opponent_id).await?;

    let flags = InGameRepository::new(&db);
    flags.set(guild_id, challenger_id, true).await?;
    flags.set(guild_id, opponent_id, true).await?;

    let outcome = play(state, ctx, command, locale, command.user.id, opponent.id).await;

    // The mutex is cleared on every exit path, including errors.
    flags.set(guild_id, challenger_id, false).await?;
    flags.set(guild_id, opponent_id, false).await?;

    outcome
}

async fn play(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    locale: &'static str,
    x_player: UserId,
    o_player: UserId,
) -> Result<(), AppError> {
    let mut board = Board::new();

    let embed = embeds::info(
        state,
        locale,
        "game.tictactoe.turn",
        &[&format!("<@{}>", x_player.get()), "❌"],
    );
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(grid(&board, false)),
            ),
        )
        .await?;

    let message = command.get_response(&ctx.http).await?;
    let mut presses = ComponentInteractionCollector::new(&ctx.shard)
        .message_id(message.id)
        .timeout(Duration::from_secs(DIALOG_TIMEOUT_SECS as u64))
        .stream();

    while let Some(press) = presses.next().await {
        let sign = if press.user.id == x_player {
            Sign::X
        } else if press.user.id == o_player {
            Sign::O
        } else {
            let _ = press.create_response(&ctx.http, CreateInteractionResponse::Acknowledge).await;
            continue;
        };

        let Some((row, col)) = parse_square(&press.data.custom_id) else {
            continue;
        };

        if board.place(sign, row, col).is_err() {
            // Wrong turn or occupied square; nothing changes.
            let _ = press.create_response(&ctx.http, CreateInteractionResponse::Acknowledge).await;
            continue;
        }

        if board.is_gameover() {
            let embed = match board.winner() {
                Some(Sign::X) => embeds::info(
                    state,
                    locale,
                    "game.tictactoe.won",
                    &[&format!("<@{}>", x_player.get())],
                ),
                Some(Sign::O) => embeds::info(
                    state,
                    locale,
                    "game.tictactoe.won",
                    &[&format!("<@{}>", o_player.get())],
                ),
                None => embeds::info(state, locale, "game.tictactoe.draw", &[]),
            };
            press
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new()
                            .embed(embed)
                            .components(grid(&board, true)),
                    ),
                )
                .await?;
            return Ok(());
        }

        let (next, mark) = match board.turn() {
            Sign::X => (x_player, "❌"),
            Sign::O => (o_player, "⭕"),
        };
        press
            .create_response(
                &ctx.http,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(embeds::info(
                            state,
                            locale,
                            "game.tictactoe.turn",
                            &[&format!("<@{}>", next.get()), mark],
                        ))
                        .components(grid(&board, false)),
                ),
            )
            .await?;
    }

    // Nobody moved for five minutes; the board is abandoned.
    let _ = command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .embed(embeds::info(state, locale, "game.tictactoe.abandoned", &[]))
                .components(grid(&board, true)),
        )
        .await;
    Ok(())
}

fn parse_square(custom_id: &str) -> Option<(usize, usize)> {
    let rest = custom_id.strip_prefix("ttt:")?;
    let (row, col) = rest.split_once(':')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

fn grid(board: &Board, disabled: bool) -> Vec<CreateActionRow> {
    (0..3)
        .map(|row| {
            CreateActionRow::Buttons(
                (0..3)
                    .map(|col| {
                        let (label, taken) = match board.square(row, col) {
                            Some(Sign::X) => ("❌", true),
                            Some(Sign::O) => ("⭕", true),
                            None => ("⬜", false),
                        };
                        CreateButton::new(format!("ttt:{row}:{col}"))
                            .label(label)
                            .style(ButtonStyle::Secondary)
                            .disabled(disabled || taken)
                    })
                    .collect(),
            )
        })
        .collect()
}
