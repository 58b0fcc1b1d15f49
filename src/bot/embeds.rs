//! Embed builders shared by every command handler.

use serenity::all::{Colour, CreateEmbed};

use crate::error::DomainError;
use crate::service::economy::format_amount;
use crate::state::BotState;

/// Red used for domain-error embeds.
pub const ERROR_COLOR: u32 = 0xED4245;

/// A plain informational embed in the configured color.
pub fn info(state: &BotState, locale: &str, key: &str, values: &[&str]) -> CreateEmbed {
    CreateEmbed::new()
        .colour(Colour::new(state.config.color))
        .description(state.locales.get(key, locale, values))
}

/// An embed whose title comes from the locale table; the caller supplies
/// the body.
pub fn titled(state: &BotState, locale: &str, key: &str, values: &[&str]) -> CreateEmbed {
    CreateEmbed::new()
        .colour(Colour::new(state.config.color))
        .title(state.locales.get(key, locale, values))
}

/// The localized error embed for a domain failure.
pub fn error(state: &BotState, locale: &str, err: &DomainError) -> CreateEmbed {
    let values = error_values(err);
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();

    CreateEmbed::new()
        .colour(Colour::new(ERROR_COLOR))
        .description(state.locales.get(err.locale_key(), locale, &refs))
}

/// Positional values substituted into each error template.
fn error_values(err: &DomainError) -> Vec<String> {
    match err {
        DomainError::NotEnoughMoney { needed, have } => {
            vec![format_amount(*needed), format_amount(*have)]
        }
        DomainError::CardNotInTrade { uid } | DomainError::AlreadyInTrade { uid } => {
            vec![uid.to_string()]
        }
        DomainError::DoesntHaveAgreedRole { required_roles } => vec![required_roles
            .iter()
            .map(|r| format!("<@&{r}>"))
            .collect::<Vec<_>>()
            .join(", ")],
        DomainError::InvalidDuration(input) => vec![input.clone()],
        DomainError::ClearOutOfRange { count, days } => {
            vec![count.to_string(), days.to_string()]
        }
        DomainError::NotEnoughBoosts { needed } => vec![needed.to_string()],
        _ => Vec::new(),
    }
}
