// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod cache;
pub mod channel;
pub mod config;
pub mod input;
pub mod kiosk;
pub mod menu;
pub mod overlay;
pub mod player;
pub mod setup;
pub mod source;
pub mod state;
pub mod timer;
pub mod tui;

pub use cache::CacheManager;
pub use channel::{Channel, ChannelList};
pub use config::Config;
pub use kiosk::Kiosk;
pub use source::ChannelSource;
pub use tui::run_tui;

/// Milliseconds since the Unix epoch, as stored in the cache and used for
/// cache-busting.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
