// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::time::{Duration, Instant};

use crate::timer::AutoHideTimer;

pub const DEFAULT_OVERLAY_TIMEOUT: Duration = Duration::from_millis(4000);

/// The transient "now playing" banner.
#[derive(Debug, Clone)]
pub struct OverlayController {
    text: String,
    visible: bool,
    timeout: Duration,
    timer: AutoHideTimer,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAY_TIMEOUT)
    }
}

impl OverlayController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            text: String::new(),
            visible: false,
            timeout,
            timer: AutoHideTimer::default(),
        }
    }

    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.show_for(text, self.timeout, now);
    }

    pub fn show_for(&mut self, text: impl Into<String>, timeout: Duration, now: Instant) {
        self.text = text.into();
        self.visible = true;
        self.timer.arm(now, timeout);
    }

    /// Shows a message that stays up until the next `show`.
    pub fn show_persistent(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
        self.timer.cancel();
    }

    /// Hides the banner when its timer expires. Returns true if it just hid.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.fire(now) {
            self.visible = false;
            return true;
        }
        false
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_show_cancels_first_timer() {
        let start = Instant::now();
        let mut overlay = OverlayController::new(Duration::from_secs(4));
        overlay.show("A", start);
        overlay.show("B", start + Duration::from_secs(1));

        let mut hides = Vec::new();
        for ms in (0..=8000).step_by(100) {
            if overlay.tick(start + Duration::from_millis(ms)) {
                hides.push(ms);
            }
        }

        assert_eq!(hides, vec![5000]);
        assert_eq!(overlay.text(), "B");
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_persistent_message_never_hides() {
        let start = Instant::now();
        let mut overlay = OverlayController::default();
        overlay.show("Now playing", start);
        overlay.show_persistent("Channels unavailable");

        assert!(!overlay.tick(start + Duration::from_secs(60)));
        assert!(overlay.is_visible());
        assert_eq!(overlay.text(), "Channels unavailable");
    }
}
