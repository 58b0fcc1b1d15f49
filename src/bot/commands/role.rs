//! `/role add|remove`.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption, Permissions,
};

use crate::bot::commands::{reply_key, role_option, subcommand, user_option};
use crate::error::{AppError, DomainError};
use crate::state::BotState;

pub fn register() -> CreateCommand {
    CreateCommand::new("role")
        .description("Give or take a role")
        .name_localized("ru", "роль")
        .name_localized("uk", "роль")
        .description_localized("ru", "Выдать или снять роль")
        .description_localized("uk", "Видати або зняти роль")
        .default_member_permissions(Permissions::MANAGE_ROLES)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "add", "Give a role")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Target member")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Role, "role", "Role to give")
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "remove", "Take a role")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Target member")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Role, "role", "Role to take")
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

    let guild_id = command.guild_id.ok_or(DomainError::MemberNotFound)?;
    let member = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;
    let role = role_option(opts, "role").ok_or(DomainError::MemberNotFound)?;

    let (key, result) = match sub {
        "add" => (
            "moderation.role.given",
            ctx.http
                .add_member_role(guild_id, member.id, role.id, None)
                .await,
        ),
        "remove" => (
            "moderation.role.taken",
            ctx.http
                .remove_member_role(guild_id, member.id, role.id, None)
                .await,
        ),
        _ => return Ok(()),
    };
    result?;

    reply_key(
        state,
        ctx,
        command,
        locale,
        key,
        &[&format!("<@&{}>", role.id.get()), &format!("<@{}>", member.id.get())],
    )
    .await
}
