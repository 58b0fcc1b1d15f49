//! Interaction routing.
//!
//! Slash commands go through the command dispatcher. Short-lived dialog
//! components (pagination, roll, trade, settings) are consumed by the
//! collectors their commands hold open, so the only components routed
//! here are the long-lived report action buttons.

use serenity::all::{Context, Interaction};

use crate::bot::commands;
use crate::state::BotState;

pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Command(command) => {
            commands::dispatch(state, &ctx, command).await;
        }
        Interaction::Component(component)
            if component.data.custom_id.starts_with(commands::report::CUSTOM_ID_PREFIX) =>
        {
            commands::report::handle_component(state, &ctx, component).await;
        }
        _ => {}
    }
}
