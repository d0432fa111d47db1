// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::channel::{Channel, ChannelList};

/// Wraps any integer index into `[0, len)`. `len` must be non-zero.
pub fn normalize(index: i64, len: usize) -> usize {
    let n = len as i64;
    (((index % n) + n) % n) as usize
}

/// The working channel list and the currently selected channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelListState {
    channels: ChannelList,
    current_index: usize,
}

impl ChannelListState {
    pub fn new(channels: ChannelList) -> Self {
        Self {
            channels,
            current_index: 0,
        }
    }

    pub fn channels(&self) -> &ChannelList {
        &self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// `None` while the list is empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.channels.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&Channel> {
        self.channels.get(self.current_index)
    }

    /// Swaps in a new list, keeping the selection wrapped into the new bounds.
    pub fn replace(&mut self, channels: ChannelList) {
        self.channels = channels;
        if !self.channels.is_empty() {
            self.current_index = normalize(self.current_index as i64, self.channels.len());
        }
    }

    pub fn select(&mut self, index: i64) -> Option<&Channel> {
        if self.channels.is_empty() {
            return None;
        }
        self.current_index = normalize(index, self.channels.len());
        self.channels.get(self.current_index)
    }

    pub fn next(&mut self) -> Option<&Channel> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<&Channel> {
        self.step(-1)
    }

    pub fn step(&mut self, delta: i64) -> Option<&Channel> {
        self.select(self.current_index as i64 + delta)
    }
}
