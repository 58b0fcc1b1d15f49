//! `/money add|remove` administrator balance adjustments.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption, Permissions,
};

use crate::bot::commands::{int_option, reply_key, subcommand, user_option};
use crate::error::{AppError, DomainError};
use crate::service::economy::{format_amount, EconomyService};
use crate::state::BotState;

pub fn register() -> CreateCommand {
    CreateCommand::new("money")
        .description("Adjust member balances")
        .name_localized("ru", "деньги")
        .name_localized("uk", "гроші")
        .description_localized("ru", "Изменить баланс участника")
        .description_localized("uk", "Змінити баланс учасника")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "add", "Credit a member")
                .description_localized("ru", "Начислить валюту участнику")
                .description_localized("uk", "Нарахувати валюту учаснику")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Target member")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "amount", "Amount")
                        .min_int_value(1)
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "remove", "Debit a member")
                .description_localized("ru", "Списать валюту с участника")
                .description_localized("uk", "Списати валюту з учасника")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "member", "Target member")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "amount", "Amount")
                        .min_int_value(1)
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

    let member = user_option(opts, "member").ok_or(DomainError::MemberNotFound)?;
    let amount = int_option(opts, "amount").ok_or(DomainError::MemberNotFound)?;
    let mention = format!("<@{}>", member.id.get());

    let service = EconomyService::new(&db);
    match sub {
        "add" => {
            let after = service
                .add(guild_id, member.id.get() as i64, amount, "transactions.admin_add")
                .await?;
            reply_key(
                state,
                ctx,
                command,
                locale,
                "money.added",
                &[&mention, &format_amount(amount), &format_amount(after)],
            )
            .await
        }
        "remove" => {
            let after = service
                .remove(guild_id, member.id.get() as i64, amount, "transactions.admin_remove")
                .await?;
            reply_key(
                state,
                ctx,
                command,
                locale,
                "money.removed",
                &[&mention, &format_amount(amount), &format_amount(after)],
            )
            .await
        }
        _ => Ok(()),
    }
}
