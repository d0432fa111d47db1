// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;

use channel_kiosk::{ChannelSource, Config};

pub mod cache;
pub mod list;
pub mod play;

pub use cache::CacheCommand;
pub use list::ListCommand;
pub use play::PlayCommand;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Invalid format: {}. Use 'text' or 'json'", s),
        }
    }
}

/// Everything a one-shot command needs: the loaded config and the channel
/// source built from it.
pub struct CommandContext {
    pub config: Config,
    pub source: ChannelSource,
}

impl CommandContext {
    pub fn new(config: Config) -> Result<Self> {
        let source = ChannelSource::from_config(&config)?;
        Ok(Self { config, source })
    }
}
