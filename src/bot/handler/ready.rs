//! Ready event handler.
//!
//! Fires after authentication and the initial gateway handshake. Used to
//! publish the slash-command tree and set the presence.

use serenity::all::{ActivityData, Command, Context, Ready};
use tracing::{error, info};

use crate::bot::commands;
use crate::state::BotState;

/// Handles the ready event.
///
/// Registers the whole command tree globally. Registration is idempotent
/// on reconnects; the platform diffs against the published tree.
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    info!("{} is connected", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom(
        state.locales.get("common.presence", "en-US", &[]),
    )));

    match Command::set_global_commands(&ctx.http, commands::register_all()).await {
        Ok(published) => info!("registered {} slash commands", published.len()),
        Err(e) => error!("failed to register slash commands: {e}"),
    }
}
