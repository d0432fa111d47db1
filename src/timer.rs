// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::time::{Duration, Instant};

/// A single-slot auto-hide deadline.
///
/// Arming always replaces the pending deadline, so there is never more than
/// one outstanding timer per owner. The owning loop calls [`fire`] with the
/// current time; an expired deadline fires exactly once.
///
/// [`fire`]: AutoHideTimer::fire
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoHideTimer {
    deadline: Option<Instant>,
}

impl AutoHideTimer {
    /// A timeout too large to represent leaves nothing pending.
    pub fn arm(&mut self, now: Instant, timeout: Duration) {
        self.deadline = now.checked_add(timeout);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true and disarms if the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
