// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;

use crate::input::Key;
use crate::kiosk::{Action, Kiosk};

/// Terminal-side state around the kiosk core: where the menu was last drawn
/// and how far it is scrolled, so clicks can be mapped back to rows.
pub struct App {
    pub kiosk: Kiosk,
    pub menu_area: Option<Rect>,
    pub menu_scroll: usize,
}

impl App {
    pub fn new(kiosk: Kiosk) -> Self {
        Self {
            kiosk,
            menu_area: None,
            menu_scroll: 0,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        self.kiosk.handle_key(Key::from(key), Instant::now())
    }

    /// Returns true if the click landed on a menu row.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.kiosk.menu().is_visible()
        {
            return false;
        }

        let Some(row) = self.menu_row_at(mouse.column, mouse.row) else {
            return false;
        };
        self.kiosk.click_menu_row(row, Instant::now());
        true
    }

    fn menu_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.menu_area?;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| (row - area.y) as usize + self.menu_scroll)
    }

    /// Scrolls the menu so the highlighted row stays within `visible` rows.
    pub fn scroll_menu_to_highlight(&mut self, visible: usize) {
        let highlighted = self.kiosk.menu().highlighted();
        if highlighted < self.menu_scroll {
            self.menu_scroll = highlighted;
        } else if visible > 0 && highlighted >= self.menu_scroll + visible {
            self.menu_scroll = highlighted + 1 - visible;
        }
    }
}
