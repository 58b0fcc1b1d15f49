use crate::service::banner::BANNER_STYLES;
use crate::view::{DialogState, DIALOG_TIMEOUT_SECS};

/// Pages the settings dialog can sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPage {
    Root,
    Economy,
    Levels,
    Channels,
    Permissions,
    Banner,
}

/// The guided settings dialog with a back-stack.
///
/// The back button pops one page; popping past the root regenerates the
/// root view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDialog {
    stack: Vec<SettingsPage>,
    state: DialogState,
}

impl SettingsDialog {
    pub fn new() -> Self {
        Self {
            stack: vec![SettingsPage::Root],
            state: DialogState::new(DIALOG_TIMEOUT_SECS),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DialogState {
        &mut self.state
    }

    pub fn current(&self) -> SettingsPage {
        *self.stack.last().unwrap_or(&SettingsPage::Root)
    }

    /// Selector press: enter a module subview.
    pub fn enter(&mut self, page: SettingsPage) {
        if !self.state.is_ended() {
            self.stack.push(page);
        }
    }

    /// Back button: pop to the previous page.
    pub fn back(&mut self) -> SettingsPage {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }
}

impl Default for SettingsDialog {
    fn default() -> Self {
        Self::new()
    }
}

/// The wipe-confirmation modal.
///
/// Proceeds only when the entered text exactly equals the locale-provided
/// confirmation phrase.
pub fn wipe_confirmed(entered: &str, expected_phrase: &str) -> bool {
    entered == expected_phrase
}

/// Banner module subview: one preview page per style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerPageView {
    page: usize,
    current_style: Option<String>,
}

impl BannerPageView {
    pub fn new(current_style: Option<String>) -> Self {
        // Open on the active style's page when one is set.
        let page = current_style
            .as_deref()
            .and_then(|s| BANNER_STYLES.iter().position(|b| *b == s))
            .unwrap_or(0);
        Self { page, current_style }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn style_on_page(&self) -> &'static str {
        BANNER_STYLES[self.page]
    }

    pub fn next(&mut self) {
        self.page = (self.page + 1) % BANNER_STYLES.len();
    }

    pub fn prev(&mut self) {
        self.page = (self.page + BANNER_STYLES.len() - 1) % BANNER_STYLES.len();
    }

    /// The set button is disabled when the shown style is already active.
    pub fn set_disabled(&self) -> bool {
        self.current_style.as_deref() == Some(self.style_on_page())
    }

    /// The disable button is disabled when no style is set.
    pub fn disable_disabled(&self) -> bool {
        self.current_style.is_none()
    }

    /// Reflects a completed set/disable back into the view.
    pub fn style_changed(&mut self, style: Option<String>) {
        self.current_style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_stack_pops_to_root() {
        let mut dialog = SettingsDialog::new();
        dialog.enter(SettingsPage::Banner);
        dialog.enter(SettingsPage::Permissions);
        assert_eq!(dialog.current(), SettingsPage::Permissions);

        assert_eq!(dialog.back(), SettingsPage::Banner);
        assert_eq!(dialog.back(), SettingsPage::Root);
        // Root is the floor.
        assert_eq!(dialog.back(), SettingsPage::Root);
    }

    #[test]
    fn ended_dialog_ignores_navigation() {
        let mut dialog = SettingsDialog::new();
        dialog.state_mut().finalize();
        dialog.enter(SettingsPage::Economy);
        assert_eq!(dialog.current(), SettingsPage::Root);
    }

    #[test]
    fn wipe_needs_the_exact_phrase() {
        assert!(wipe_confirmed("wipe everything", "wipe everything"));
        assert!(!wipe_confirmed("Wipe everything", "wipe everything"));
        assert!(!wipe_confirmed("wipe everything ", "wipe everything"));
    }

    #[test]
    fn banner_buttons_follow_the_active_style() {
        let mut view = BannerPageView::new(Some("yellow".to_string()));
        assert_eq!(view.style_on_page(), "yellow");
        assert!(view.set_disabled());
        assert!(!view.disable_disabled());

        view.next();
        assert!(!view.set_disabled());

        view.style_changed(None);
        assert!(view.disable_disabled());
    }

    #[test]
    fn banner_pages_wrap_both_ways() {
        let mut view = BannerPageView::new(None);
        assert_eq!(view.page(), 0);
        view.prev();
        assert_eq!(view.page(), BANNER_STYLES.len() - 1);
        view.next();
        assert_eq!(view.page(), 0);
    }
}
