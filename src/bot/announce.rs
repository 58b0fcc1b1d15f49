//! Level-up announcement listener.
//!
//! The message handler publishes a [`LevelUpAnnouncement`] whenever XP
//! accrual crossed a level boundary; this listener renders either the
//! templated localized embed or the guild's custom form and posts it to
//! the source channel.

use std::sync::Arc;

use serde::Deserialize;
use serenity::all::{ChannelId, Colour, CreateEmbed, CreateMessage};
use serenity::http::Http;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::data::guild_settings::GuildSettingsRepository;
use crate::error::AppError;
use crate::service::leveling::LevelUp;
use crate::state::BotState;

/// One level-up crossing, enriched with the presentation context only
/// the message handler knows.
#[derive(Debug, Clone)]
pub struct LevelUpAnnouncement {
    pub channel_id: u64,
    pub locale: &'static str,
    pub member_name: String,
    pub member_avatar: String,
    pub up: LevelUp,
}

/// The stored custom announcement form.
#[derive(Debug, Deserialize)]
struct CustomEmbedForm {
    title: Option<String>,
    description: String,
    color: Option<u32>,
    image_url: Option<String>,
}

/// Consumes the level-up bus until the sender side is dropped.
pub async fn run_level_up_listener(
    state: BotState,
    http: Arc<Http>,
    mut events: mpsc::UnboundedReceiver<LevelUpAnnouncement>,
) {
    while let Some(event) = events.recv().await {
        if let Err(e) = announce(&state, &http, &event).await {
            error!(
                guild_id = event.up.guild_id,
                user_id = event.up.user_id,
                "level-up announcement failed: {e}"
            );
        }
    }
}

async fn announce(
    state: &BotState,
    http: &Http,
    event: &LevelUpAnnouncement,
) -> Result<(), AppError> {
    let custom_form = match state.gateway.connection().await {
        Some(db) => GuildSettingsRepository::new(&db)
            .find(event.up.guild_id)
            .await?
            .and_then(|s| s.level_up_embed),
        None => None,
    };

    let embed = match custom_form {
        Some(form) => match serde_json::from_value::<CustomEmbedForm>(form) {
            Ok(form) => custom_embed(state, event, form),
            Err(e) => {
                // A broken stored form must not silence announcements.
                warn!(guild_id = event.up.guild_id, "stored level-up form is invalid: {e}");
                templated_embed(state, event)
            }
        },
        None => templated_embed(state, event),
    };

    let message = ChannelId::new(event.channel_id)
        .send_message(http, CreateMessage::new().embed(embed))
        .await;

    // The channel may be gone or locked down since the message arrived.
    if let Err(e) = message {
        warn!(channel_id = event.channel_id, "could not post level-up: {e}");
    }
    Ok(())
}

fn templated_embed(state: &BotState, event: &LevelUpAnnouncement) -> CreateEmbed {
    let up = &event.up;
    let key = if up.can_prestige {
        "levels.level_up_prestige_ready"
    } else {
        "levels.level_up"
    };

    let description = state.locales.get(
        key,
        event.locale,
        &[
            &format!("<@{}>", up.user_id),
            &up.level.to_string(),
            &up.last_level.to_string(),
            &up.exp_now.to_string(),
            &up.exp_need.to_string(),
            &up.prestige.to_string(),
        ],
    );

    CreateEmbed::new()
        .colour(Colour::new(state.config.color))
        .description(description)
        .thumbnail(event.member_avatar.clone())
}

fn custom_embed(state: &BotState, event: &LevelUpAnnouncement, form: CustomEmbedForm) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .colour(Colour::new(form.color.unwrap_or(state.config.color)))
        .description(substitute(&form.description, event));

    if let Some(title) = form.title {
        embed = embed.title(substitute(&title, event));
    }
    if let Some(image_url) = form.image_url {
        embed = embed.image(substitute(&image_url, event));
    }
    embed
}

/// Replaces the named placeholders of the custom form.
fn substitute(template: &str, event: &LevelUpAnnouncement) -> String {
    let up = &event.up;
    template
        .replace("{member}", &format!("<@{}>", up.user_id))
        .replace("{rank}", &up.level.to_string())
        .replace("{last_rank}", &up.last_level.to_string())
        .replace("{now_exp}", &up.exp_now.to_string())
        .replace("{need_exp}", &up.exp_need.to_string())
        .replace("{prestige}", &up.prestige.to_string())
        .replace("{member_avatar}", &event.member_avatar)
        .replace("{can_prestige}", if up.can_prestige { "✓" } else { "✗" })
        .replace("{member_name}", &event.member_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> LevelUpAnnouncement {
        LevelUpAnnouncement {
            channel_id: 1,
            locale: "en-US",
            member_name: "alice".to_string(),
            member_avatar: "https://cdn.example/alice.png".to_string(),
            up: LevelUp {
                guild_id: 1,
                user_id: 42,
                last_level: 4,
                level: 5,
                prestige: 2,
                exp_now: 10,
                exp_need: 300,
                can_prestige: false,
            },
        }
    }

    #[test]
    fn substitutes_every_placeholder() {
        let out = substitute("{member} {rank} {last_rank} {now_exp}/{need_exp} p{prestige}", &event());
        assert_eq!(out, "<@42> 5 4 10/300 p2");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(substitute("{member} {unknown}", &event()), "<@42> {unknown}");
    }
}
