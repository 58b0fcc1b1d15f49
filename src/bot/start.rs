use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::error::AppError;
use crate::state::BotState;

/// Builds the gateway client with the event handler attached.
///
/// The caller keeps `client.http` and `client.cache` for the periodic
/// task supervisor before handing the client to [`start_bot`].
///
/// # Arguments
/// - `state` - shared bot state cloned into the event handler
///
/// # Returns
/// - `Ok(Client)` - configured client, not yet connected
/// - `Err(AppError)` - client construction failed
pub async fn init_bot(state: BotState) -> Result<Client, AppError> {
    // MESSAGE_CONTENT and GUILD_MEMBERS are privileged intents; both must
    // be enabled in the developer portal.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MODERATION;

    let handler = Handler::new(state.clone());

    let client = Client::builder(&state.config.bot_token, intents)
        .event_handler(handler)
        .await?;

    Ok(client)
}

/// Runs the gateway client. Blocks until the connection shuts down.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    client.start().await?;
    Ok(())
}
