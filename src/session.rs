//! Run-wide session state shared by every muffin.
//!
//! `SessionState` holds the "show menu" intent. The menu's Start button (and
//! the start key) clears it, the death sequence sets it again, and each
//! muffin reconciles its own UI state against it once per frame.
use bevy::prelude::*;

/// Coarse menu/play phase derived from `SessionState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    MenuShown,
    Playing,
}

/// Shared menu intent plus a few run counters used by the debug dump.
#[derive(Resource, Debug, Clone)]
pub struct SessionState {
    /// Whether the menu should be visible. Starts `true`.
    pub show_menu: bool,
    /// Number of runs started since launch.
    pub runs_started: u32,
    /// Best score reached in any run since launch.
    pub best_score: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { show_menu: true, runs_started: 0, best_score: 0 }
    }
}

impl SessionState {
    /// Start-click callback: hide the menu on the next UI sync.
    pub fn on_start_click(&mut self) {
        if self.show_menu {
            self.show_menu = false;
            self.runs_started += 1;
        }
    }

    /// Ask every muffin to bring the menu back.
    pub fn request_menu(&mut self) {
        self.show_menu = true;
    }

    pub fn record_score(&mut self, score: u32) {
        self.best_score = self.best_score.max(score);
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase() == RunPhase::Playing
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        if self.show_menu { RunPhase::MenuShown } else { RunPhase::Playing }
    }
}

/// Entity of the muffin registered at begin-play, if any.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ActivePlayer(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_menu() {
        let session = SessionState::default();
        assert!(session.show_menu);
        assert_eq!(session.phase(), RunPhase::MenuShown);
    }

    #[test]
    fn start_click_counts_once_per_run() {
        let mut session = SessionState::default();
        session.on_start_click();
        session.on_start_click();
        assert_eq!(session.phase(), RunPhase::Playing);
        assert_eq!(session.runs_started, 1);

        session.request_menu();
        session.on_start_click();
        assert_eq!(session.runs_started, 2);
    }

    #[test]
    fn best_score_only_grows() {
        let mut session = SessionState::default();
        session.record_score(4);
        session.record_score(2);
        assert_eq!(session.best_score, 4);
    }
}
