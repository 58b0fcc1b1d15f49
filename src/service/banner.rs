use rand::Rng;

use crate::error::DomainError;

/// Banner styles the render service knows how to draw.
pub const BANNER_STYLES: [&str; 4] = ["green", "yellow", "pink", "blue"];

/// Boost count a guild must exceed to keep a banner style.
pub const MIN_BOOSTS: u64 = 6;

/// Activity phrases fed to the banner render call, one picked per tick.
pub const ACTIVITY_PHRASES: [&str; 6] = [
    "chatting away",
    "keeping the server alive",
    "on a message streak",
    "voice of the hour",
    "community favorite",
    "making some noise",
];

/// Whether the guild's boost count allows the banner module.
pub fn ensure_boosts(premium_subscription_count: u64) -> Result<(), DomainError> {
    if premium_subscription_count <= MIN_BOOSTS {
        return Err(DomainError::NotEnoughBoosts { needed: MIN_BOOSTS });
    }
    Ok(())
}

pub fn is_known_style(style: &str) -> bool {
    BANNER_STYLES.contains(&style)
}

/// Picks the member featured on this tick's banner.
///
/// Preference order: the activity window's top member, then a uniform
/// random voice-channel member, then a uniform random guild member.
pub fn select_feature_member<R: Rng>(
    rng: &mut R,
    most_active: Option<u64>,
    voice_members: &[u64],
    all_members: &[u64],
) -> Option<u64> {
    if let Some(user_id) = most_active {
        return Some(user_id);
    }
    if !voice_members.is_empty() {
        return Some(voice_members[rng.random_range(0..voice_members.len())]);
    }
    if !all_members.is_empty() {
        return Some(all_members[rng.random_range(0..all_members.len())]);
    }
    None
}

/// Random activity phrase for the render call.
pub fn activity_phrase<R: Rng>(rng: &mut R) -> &'static str {
    ACTIVITY_PHRASES[rng.random_range(0..ACTIVITY_PHRASES.len())]
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn boost_guard_needs_more_than_six() {
        assert!(ensure_boosts(6).is_err());
        assert!(ensure_boosts(7).is_ok());
        assert!(ensure_boosts(0).is_err());
    }

    #[test]
    fn window_winner_beats_fallbacks() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_feature_member(&mut rng, Some(42), &[1, 2], &[1, 2, 3]);
        assert_eq!(picked, Some(42));
    }

    #[test]
    fn voice_members_beat_the_full_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_feature_member(&mut rng, None, &[7, 8], &[1, 2, 3]);
        assert!(matches!(picked, Some(7) | Some(8)));
    }

    #[test]
    fn empty_guild_selects_nobody() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_feature_member(&mut rng, None, &[], &[]), None);
    }
}
