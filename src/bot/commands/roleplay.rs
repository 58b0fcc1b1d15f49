//! `/roleplay`: flavor embeds, no persistent state.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
};

use crate::bot::commands::{reply_embed, str_option, subcommand, user_option};
use crate::bot::embeds;
use crate::error::{AppError, DomainError};
use crate::state::BotState;

const SOLO_ACTIONS: [&str; 4] = ["cry", "dance", "laugh", "sleep"];
const DUO_ACTIONS: [&str; 4] = ["hug", "pat", "poke", "highfive"];

pub fn register() -> CreateCommand {
    let mut solo_action =
        CreateCommandOption::new(CommandOptionType::String, "action", "What to do").required(true);
    for action in SOLO_ACTIONS {
        solo_action = solo_action.add_string_choice(action, action);
    }

    let mut duo_action =
        CreateCommandOption::new(CommandOptionType::String, "action", "What to do").required(true);
    for action in DUO_ACTIONS {
        duo_action = duo_action.add_string_choice(action, action);
    }

    CreateCommand::new("roleplay")
        .description("Roleplay actions")
        .name_localized("ru", "рп")
        .name_localized("uk", "рп")
        .description_localized("ru", "Ролевые действия")
        .description_localized("uk", "Рольові дії")
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "solo", "An action by yourself")
                .add_sub_option(solo_action),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "duo", "An action with someone")
                .add_sub_option(duo_action)
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Who with")
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "custom", "Your own action")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "text", "Action text")
                        .required(true),
                ),
        )
}

pub async fn run(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    locale: &'static str,
) -> Result<(), AppError> {
    let options = command.data.options();
    let Some((sub, opts)) = subcommand(&options) else {
        return Ok(());
    };

    let author = format!("<@{}>", command.user.id.get());
    let embed = match sub {
        "solo" => {
            let action = str_option(opts, "action").ok_or(DomainError::MemberNotFound)?;
            embeds::info(state, locale, &format!("roleplay.solo.{action}"), &[&author])
        }
        "duo" => {
            let action = str_option(opts, "action").ok_or(DomainError::MemberNotFound)?;
            let partner = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;
            embeds::info(
                state,
                locale,
                &format!("roleplay.duo.{action}"),
                &[&author, &format!("<@{}>", partner.id.get())],
            )
        }
        "custom" => {
            let text = str_option(opts, "text").ok_or(DomainError::MemberNotFound)?;
            embeds::info(state, locale, "roleplay.custom", &[&author, text])
        }
        _ => return Ok(()),
    };

    reply_embed(ctx, command, embed, false).await
}
