// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MediaKeyCode};

use crate::menu::MenuState;

/// Remote-control code for "next" (volume up on most remotes).
pub const REMOTE_NEXT: u16 = 233;
/// Remote-control code for "previous" (volume down on most remotes).
pub const REMOTE_PREV: u16 = 234;
/// Remote-control code for "back" / menu toggle.
pub const REMOTE_BACK: u16 = 36;

/// Semantic key identities understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    Quit,
    Other,
}

impl Key {
    /// Aliases numeric remote-control codes onto named keys.
    pub fn from_remote_code(code: u16) -> Self {
        match code {
            REMOTE_NEXT => Key::Down,
            REMOTE_PREV => Key::Up,
            REMOTE_BACK => Key::Back,
            _ => Key::Other,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Key::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Key::Up,
            KeyCode::Down | KeyCode::Char('j') => Key::Down,
            KeyCode::Left | KeyCode::Char('h') => Key::Left,
            KeyCode::Right | KeyCode::Char('l') => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char('q') => Key::Quit,
            // Terminals deliver remote buttons as media/navigation keys.
            KeyCode::Media(MediaKeyCode::RaiseVolume) => Key::from_remote_code(REMOTE_NEXT),
            KeyCode::Media(MediaKeyCode::LowerVolume) => Key::from_remote_code(REMOTE_PREV),
            KeyCode::Home | KeyCode::Esc | KeyCode::Backspace => {
                Key::from_remote_code(REMOTE_BACK)
            }
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the menu highlight by the given offset.
    MoveHighlight(i64),
    /// Play the highlighted entry and close the menu.
    Commit,
    HideMenu,
    ShowMenu,
    /// Keep the open menu up for another full timeout.
    ExtendMenu,
    /// Change the playing channel by the given offset.
    Step(i64),
    Quit,
    None,
}

/// Maps a key to a command given the current menu state.
pub fn route(menu: MenuState, key: Key) -> Command {
    match (menu, key) {
        (_, Key::Quit) => Command::Quit,

        (MenuState::Visible, Key::Down) => Command::MoveHighlight(1),
        (MenuState::Visible, Key::Up) => Command::MoveHighlight(-1),
        (MenuState::Visible, Key::Enter) => Command::Commit,
        (MenuState::Visible, Key::Left | Key::Back) => Command::HideMenu,
        (MenuState::Visible, Key::Right) => Command::ExtendMenu,

        (MenuState::Hidden, Key::Down) => Command::Step(1),
        (MenuState::Hidden, Key::Up) => Command::Step(-1),
        (MenuState::Hidden, Key::Right | Key::Back) => Command::ShowMenu,

        _ => Command::None,
    }
}
