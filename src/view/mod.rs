//! Dialog state machines behind the interactive views.
//!
//! Only the transitions live here; embed and component rendering happens
//! in the bot layer. Every view carries a [`DialogState`] so a late
//! button press or the timeout task cannot double-finalize it.

pub mod paginator;
pub mod roll;
pub mod settings;
pub mod trade;
pub mod warn;

use chrono::{DateTime, Duration, Utc};

/// Default lifetime of settings subviews and trade offers.
pub const DIALOG_TIMEOUT_SECS: i64 = 300;

/// Timeout-bound dialog state shared by all views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    expires_at: DateTime<Utc>,
    ended: bool,
}

impl DialogState {
    pub fn new(timeout_secs: i64) -> Self {
        Self {
            expires_at: Utc::now() + Duration::seconds(timeout_secs),
            ended: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Marks the dialog finished.
    ///
    /// # Returns
    /// - `true` - this call ended the dialog; run the teardown
    /// - `false` - already finalized; the caller must do nothing
    pub fn finalize(&mut self) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_runs_once() {
        let mut state = DialogState::new(30);
        assert!(state.finalize());
        assert!(!state.finalize());
        assert!(state.is_ended());
    }

    #[test]
    fn expiry_follows_the_clock() {
        let state = DialogState::new(30);
        assert!(!state.is_expired(Utc::now()));
        assert!(state.is_expired(Utc::now() + Duration::seconds(31)));
    }
}
