use serenity::all::{Context, EventHandler, Interaction, Message, Ready};
use serenity::async_trait;

use crate::state::BotState;

pub mod interaction;
pub mod message;
pub mod ready;

/// Gateway event handler.
pub struct Handler {
    pub state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is connected and the gateway handshake is done
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, ctx, ready).await;
    }

    /// Called for every message the bot can see
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.state, ctx, message).await;
    }

    /// Called for slash commands, component presses, and modal submits
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.state, ctx, interaction).await;
    }
}
