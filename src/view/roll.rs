use crate::service::cards::{auto_pick, RollCandidate};
use crate::view::DialogState;

/// Roll dialogs stay open for 30 seconds.
pub const ROLL_TIMEOUT_SECS: i64 = 30;

/// The three-button card-roll dialog.
///
/// Selecting a button commits that candidate; when the timeout fires
/// first, the candidate with the highest star count wins (lowest index on
/// ties).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollDialog {
    pub candidates: [RollCandidate; 3],
    state: DialogState,
}

impl RollDialog {
    pub fn new(candidates: [RollCandidate; 3]) -> Self {
        Self {
            candidates,
            state: DialogState::new(ROLL_TIMEOUT_SECS),
        }
    }

    /// Button press: commit candidate `index`.
    ///
    /// # Returns
    /// - `Some(candidate)` - the press ended the dialog
    /// - `None` - out-of-range index or the dialog already ended
    pub fn select(&mut self, index: usize) -> Option<RollCandidate> {
        if index >= self.candidates.len() || !self.state.finalize() {
            return None;
        }
        Some(self.candidates[index])
    }

    /// Timeout path: auto-select the best candidate.
    ///
    /// # Returns
    /// - `Some(candidate)` - the timeout ended the dialog
    /// - `None` - a press already ended it
    pub fn timeout(&mut self) -> Option<RollCandidate> {
        if !self.state.finalize() {
            return None;
        }
        Some(self.candidates[auto_pick(&self.candidates)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> [RollCandidate; 3] {
        let t = crate::cards::template(1).unwrap();
        [
            RollCandidate { template: t, stars: 1 },
            RollCandidate { template: t, stars: 4 },
            RollCandidate { template: t, stars: 2 },
        ]
    }

    #[test]
    fn press_beats_timeout() {
        let mut dialog = RollDialog::new(candidates());
        let chosen = dialog.select(0).unwrap();
        assert_eq!(chosen.stars, 1);

        assert!(dialog.timeout().is_none());
        assert!(dialog.select(2).is_none());
    }

    #[test]
    fn timeout_auto_selects_highest_stars() {
        let mut dialog = RollDialog::new(candidates());
        let chosen = dialog.timeout().unwrap();
        assert_eq!(chosen.stars, 4);
    }

    #[test]
    fn out_of_range_press_keeps_the_dialog_open() {
        let mut dialog = RollDialog::new(candidates());
        assert!(dialog.select(3).is_none());
        assert!(dialog.select(1).is_some());
    }
}
