// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::UiConfig;
use crate::input::{Command, Key, route};
use crate::menu::MenuController;
use crate::overlay::OverlayController;
use crate::player::PlaybackSink;
use crate::source::{Origin, SourceEvent};
use crate::state::ChannelListState;

pub const UNAVAILABLE_MESSAGE: &str = "Channels unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
}

/// Everything the kiosk screen owns for as long as it is open: the channel
/// list and selection, the menu and overlay controllers, and the playback
/// surface.
pub struct Kiosk {
    channels: ChannelListState,
    menu: MenuController,
    overlay: OverlayController,
    sink: Box<dyn PlaybackSink>,
    playing: bool,
    unavailable: bool,
}

impl Kiosk {
    pub fn new(sink: Box<dyn PlaybackSink>, ui: &UiConfig) -> Self {
        Self {
            channels: ChannelListState::default(),
            menu: MenuController::new(ui.menu_timeout()),
            overlay: OverlayController::new(ui.overlay_timeout()),
            sink,
            playing: false,
            unavailable: false,
        }
    }

    pub fn channels(&self) -> &ChannelListState {
        &self.channels
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn apply(&mut self, event: SourceEvent, now: Instant) {
        match event {
            SourceEvent::ListUpdated { channels, origin } => {
                info!("Channel list updated from {} ({} channels)", origin, channels.len());
                let keep_playing = origin == Origin::Remote && self.playing;

                self.channels.replace(channels);
                self.menu.wrap_to(self.channels.len());
                self.unavailable = false;

                if !keep_playing {
                    self.play(0, now);
                }
            }
            SourceEvent::Unavailable => {
                if self.channels.is_empty() {
                    self.unavailable = true;
                    self.overlay.show_persistent(UNAVAILABLE_MESSAGE);
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> Option<Action> {
        let command = route(self.menu.state(), key);
        debug!("{:?} -> {:?}", key, command);

        match command {
            Command::Quit => return Some(Action::Quit),
            Command::MoveHighlight(delta) => {
                self.menu.move_highlight(delta, self.channels.len(), now);
            }
            Command::Commit => {
                if let Some(index) = self.menu.commit() {
                    self.play(index as i64, now);
                }
            }
            Command::HideMenu => self.menu.hide(),
            Command::ShowMenu => {
                let current = self.channels.current_index().unwrap_or(0);
                self.menu.show(current, now);
            }
            Command::ExtendMenu => self.menu.extend(now),
            Command::Step(delta) => {
                if let Some(current) = self.channels.current_index() {
                    self.play(current as i64 + delta, now);
                }
            }
            Command::None => {}
        }
        None
    }

    /// A pointer click on a menu row selects it just like Enter would.
    pub fn click_menu_row(&mut self, row: usize, now: Instant) {
        if let Some(index) = self.menu.commit_at(row, self.channels.len()) {
            self.play(index as i64, now);
        }
    }

    /// Fires expired timers. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.menu.tick(now);
        changed |= self.overlay.tick(now);

        if let Some(message) = self.sink.poll_exit() {
            self.overlay.show(message, now);
            changed = true;
        }
        changed
    }

    /// The earliest pending auto-hide deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.menu.deadline(), self.overlay.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.sink.shutdown()
    }

    fn play(&mut self, index: i64, now: Instant) {
        let Some(channel) = self.channels.select(index).cloned() else {
            return;
        };

        let url = channel.playback_url(crate::now_epoch_ms());
        info!("Playing {}", channel.label());

        match self.sink.set_source(&url) {
            Ok(()) => self.overlay.show(channel.label(), now),
            Err(e) => {
                error!("Failed to play {}: {:#}", channel.label(), e);
                self.overlay.show(format!("{}: {}", channel.label(), e), now);
            }
        }

        self.playing = true;
        if let Some(current) = self.channels.current_index() {
            self.menu.sync_selection(current);
        }
    }
}
