// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::time::{Duration, Instant};

use crate::state::normalize;
use crate::timer::AutoHideTimer;

pub const DEFAULT_MENU_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Visible,
}

/// The on-screen channel list.
///
/// The highlight moves independently of the playing channel; only
/// [`commit`](MenuController::commit) turns it into a playback change.
#[derive(Debug, Clone)]
pub struct MenuController {
    state: MenuState,
    highlighted: usize,
    timeout: Duration,
    timer: AutoHideTimer,
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new(DEFAULT_MENU_TIMEOUT)
    }
}

impl MenuController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: MenuState::Hidden,
            highlighted: 0,
            timeout,
            timer: AutoHideTimer::default(),
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == MenuState::Visible
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Opens the menu with the highlight on the playing channel.
    pub fn show(&mut self, current: usize, now: Instant) {
        self.show_for(current, self.timeout, now);
    }

    pub fn show_for(&mut self, current: usize, timeout: Duration, now: Instant) {
        self.state = MenuState::Visible;
        self.highlighted = current;
        self.timer.arm(now, timeout);
    }

    pub fn hide(&mut self) {
        self.state = MenuState::Hidden;
        self.timer.cancel();
    }

    /// Keeps the highlight in step with the playing channel.
    pub fn sync_selection(&mut self, current: usize) {
        self.highlighted = current;
    }

    /// Re-wraps the highlight after the list was replaced.
    pub fn wrap_to(&mut self, len: usize) {
        if len > 0 {
            self.highlighted = normalize(self.highlighted as i64, len);
        }
    }

    /// Moves the highlight by `delta`, wrapping over `len` entries, and
    /// extends the visible window by the full timeout.
    pub fn move_highlight(&mut self, delta: i64, len: usize, now: Instant) {
        if !self.is_visible() || len == 0 {
            return;
        }
        self.highlighted = normalize(self.highlighted as i64 + delta, len);
        self.timer.arm(now, self.timeout);
    }

    /// Restarts the auto-hide timer of an open menu; the highlight stays.
    pub fn extend(&mut self, now: Instant) {
        if self.is_visible() {
            self.timer.arm(now, self.timeout);
        }
    }

    /// Hides the menu and returns the highlighted index for playback.
    pub fn commit(&mut self) -> Option<usize> {
        if !self.is_visible() {
            return None;
        }
        self.hide();
        Some(self.highlighted)
    }

    /// Commits a specific row, as a pointer click does.
    pub fn commit_at(&mut self, index: usize, len: usize) -> Option<usize> {
        if !self.is_visible() || index >= len {
            return None;
        }
        self.highlighted = index;
        self.commit()
    }

    /// Hides the menu when its timer expires. Returns true if it just hid.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.fire(now) {
            self.state = MenuState::Hidden;
            return true;
        }
        false
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_highlights_current_and_hides_after_timeout() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(3, start);

        assert!(menu.is_visible());
        assert_eq!(menu.highlighted(), 3);
        assert!(!menu.tick(start + Duration::from_millis(4999)));
        assert!(menu.tick(start + Duration::from_millis(5000)));
        assert_eq!(menu.state(), MenuState::Hidden);
    }

    #[test]
    fn test_navigation_extends_full_timeout() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(0, start);
        menu.move_highlight(1, 4, start + Duration::from_secs(4));

        assert!(!menu.tick(start + Duration::from_secs(5)));
        assert!(menu.tick(start + Duration::from_secs(9)));
    }

    #[test]
    fn test_second_show_cancels_first_timer() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(0, start);
        menu.show(0, start + Duration::from_secs(1));

        assert!(!menu.tick(start + Duration::from_secs(5)));
        assert!(menu.is_visible());
        assert!(menu.tick(start + Duration::from_secs(6)));
        assert!(!menu.tick(start + Duration::from_secs(12)));
    }

    #[test]
    fn test_extend_keeps_highlight_and_restarts_timeout() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(0, start);
        menu.move_highlight(2, 4, start);
        menu.extend(start + Duration::from_secs(3));

        assert_eq!(menu.highlighted(), 2);
        assert!(!menu.tick(start + Duration::from_secs(7)));
        assert!(menu.tick(start + Duration::from_secs(8)));

        menu.extend(start + Duration::from_secs(9));
        assert!(menu.deadline().is_none());
    }

    #[test]
    fn test_highlight_wraps() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(0, start);
        menu.move_highlight(-1, 4, start);
        assert_eq!(menu.highlighted(), 3);
        menu.move_highlight(1, 4, start);
        assert_eq!(menu.highlighted(), 0);
    }

    #[test]
    fn test_commit_hides_and_cancels_timer() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(1, start);
        menu.move_highlight(1, 3, start);

        assert_eq!(menu.commit(), Some(2));
        assert!(!menu.is_visible());
        assert!(menu.deadline().is_none());
        assert_eq!(menu.commit(), None);
    }

    #[test]
    fn test_commit_at_ignores_out_of_range_rows() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.show(0, start);
        assert_eq!(menu.commit_at(5, 3), None);
        assert!(menu.is_visible());
        assert_eq!(menu.commit_at(2, 3), Some(2));
    }

    #[test]
    fn test_hidden_menu_ignores_moves() {
        let start = Instant::now();
        let mut menu = MenuController::default();
        menu.move_highlight(1, 3, start);
        assert_eq!(menu.highlighted(), 0);
        assert!(menu.deadline().is_none());
    }
}
