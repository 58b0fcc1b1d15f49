use crate::view::{DialogState, DIALOG_TIMEOUT_SECS};

/// Buttons the trade offer view can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeButton {
    Accept,
    Decline,
    /// Decline relabeled for the offerer's own view.
    Cancel,
}

impl TradeButton {
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Accept => "cards.trade.accept",
            Self::Decline => "cards.trade.decline",
            Self::Cancel => "cards.trade.cancel",
        }
    }
}

/// Presentation state of one open trade offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOfferView {
    pub trade_id: i32,
    pub offerer_user_id: i64,
    pub offeree_user_id: i64,
    state: DialogState,
}

impl TradeOfferView {
    pub fn new(trade: &entity::trade::Model) -> Self {
        Self {
            trade_id: trade.id,
            offerer_user_id: trade.offerer_user_id,
            offeree_user_id: trade.offeree_user_id,
            state: DialogState::new(DIALOG_TIMEOUT_SECS),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DialogState {
        &mut self.state
    }

    /// Buttons shown to a viewer. The offerer never sees accept and gets
    /// decline relabeled as cancel; third parties get nothing.
    pub fn buttons_for(&self, viewer_user_id: i64) -> Vec<TradeButton> {
        if viewer_user_id == self.offerer_user_id {
            vec![TradeButton::Cancel]
        } else if viewer_user_id == self.offeree_user_id {
            vec![TradeButton::Accept, TradeButton::Decline]
        } else {
            Vec::new()
        }
    }

    /// Whether a press of `button` by `viewer_user_id` is allowed.
    pub fn can_press(&self, viewer_user_id: i64, button: TradeButton) -> bool {
        !self.state.is_ended() && self.buttons_for(viewer_user_id).contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn trade() -> entity::trade::Model {
        entity::trade::Model {
            id: 1,
            guild_id: 1,
            offerer_user_id: 10,
            offerer_uid: 100,
            offeree_user_id: 20,
            offeree_uid: 200,
            state: "open".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn offerer_sees_only_cancel() {
        let view = TradeOfferView::new(&trade());
        assert_eq!(view.buttons_for(10), vec![TradeButton::Cancel]);
        assert!(!view.can_press(10, TradeButton::Accept));
    }

    #[test]
    fn offeree_sees_accept_and_decline() {
        let view = TradeOfferView::new(&trade());
        assert_eq!(view.buttons_for(20), vec![TradeButton::Accept, TradeButton::Decline]);
    }

    #[test]
    fn third_parties_cannot_press_anything() {
        let view = TradeOfferView::new(&trade());
        assert!(view.buttons_for(99).is_empty());
        assert!(!view.can_press(99, TradeButton::Decline));
    }

    #[test]
    fn no_presses_after_finalize() {
        let mut view = TradeOfferView::new(&trade());
        view.state_mut().finalize();
        assert!(!view.can_press(20, TradeButton::Accept));
    }
}
