//! Rolling per-guild message-activity window.
//!
//! Incremented by the message listener for every non-bot guild message and
//! read by the banner scheduler when picking the featured member. Cleared
//! wholesale every two hours by the activity-reset loop. Never persisted;
//! consistency is best-effort.

use std::collections::HashMap;
use std::sync::Mutex;

/// Volatile guild -> member -> message count map.
pub struct ActivityWindow {
    counts: Mutex<HashMap<u64, HashMap<u64, u64>>>,
}

impl ActivityWindow {
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one message from `user_id` in `guild_id`.
    pub fn bump(&self, guild_id: u64, user_id: u64) {
        let mut counts = self.counts.lock().expect("activity window lock poisoned");
        *counts.entry(guild_id).or_default().entry(user_id).or_insert(0) += 1;
    }

    /// Message count for one member, zero when absent.
    pub fn count(&self, guild_id: u64, user_id: u64) -> u64 {
        let counts = self.counts.lock().expect("activity window lock poisoned");
        counts
            .get(&guild_id)
            .and_then(|g| g.get(&user_id))
            .copied()
            .unwrap_or(0)
    }

    /// The member with the highest count in `guild_id`, if any activity
    /// was recorded since the last reset.
    pub fn most_active(&self, guild_id: u64) -> Option<(u64, u64)> {
        let counts = self.counts.lock().expect("activity window lock poisoned");
        counts
            .get(&guild_id)?
            .iter()
            .max_by_key(|(user, count)| (**count, std::cmp::Reverse(**user)))
            .map(|(user, count)| (*user, *count))
    }

    /// Clears the whole window.
    pub fn clear(&self) {
        self.counts
            .lock()
            .expect("activity window lock poisoned")
            .clear();
    }
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_increments_by_exactly_one() {
        let window = ActivityWindow::new();
        window.bump(1, 10);
        window.bump(1, 10);
        window.bump(1, 11);

        assert_eq!(window.count(1, 10), 2);
        assert_eq!(window.count(1, 11), 1);
        assert_eq!(window.count(2, 10), 0);
    }

    #[test]
    fn most_active_prefers_highest_count() {
        let window = ActivityWindow::new();
        window.bump(1, 10);
        window.bump(1, 11);
        window.bump(1, 11);

        assert_eq!(window.most_active(1), Some((11, 2)));
    }

    #[test]
    fn most_active_is_none_without_activity() {
        let window = ActivityWindow::new();
        assert_eq!(window.most_active(1), None);
    }

    #[test]
    fn clear_resets_all_guilds() {
        let window = ActivityWindow::new();
        window.bump(1, 10);
        window.bump(2, 20);

        window.clear();

        assert_eq!(window.count(1, 10), 0);
        assert_eq!(window.count(2, 20), 0);
        assert_eq!(window.most_active(1), None);

        // Counting resumes normally after a reset.
        window.bump(1, 10);
        assert_eq!(window.count(1, 10), 1);
    }
}
