// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use chrono::{DateTime, Local};

use super::CommandContext;

pub enum CacheCommand {
    Show,
    Refresh,
    Clear,
}

impl CacheCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let Some(cache) = context.source.cache() else {
            println!("Cache is disabled in the configuration");
            return Ok(());
        };

        match self {
            Self::Show => {
                println!("Cache file: {}", cache.path().display());
                match cache.read().await {
                    Ok(Some(record)) => {
                        let now = channel_kiosk::now_epoch_ms();
                        let fetched = DateTime::from_timestamp_millis(record.fetched_at_epoch_ms)
                            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_else(|| "unknown".to_string());
                        let window = context.config.source.refresh_interval();
                        println!("Channels:   {}", record.channels.len());
                        println!(
                            "Fetched:    {} ({} minute(s) ago)",
                            fetched,
                            record.age(now).as_secs() / 60
                        );
                        println!(
                            "Stale:      {}",
                            if record.is_stale(now, window) { "yes" } else { "no" }
                        );
                    }
                    Ok(None) => println!("Nothing cached yet"),
                    Err(e) => println!("Cache is unreadable: {:#}", e),
                }
            }
            Self::Refresh => {
                eprintln!("Refreshing channel list...");
                match context.source.refresh().await {
                    Ok(channels) => println!("✓ Cache refreshed with {} channel(s)", channels.len()),
                    Err(e) => eprintln!("Warning: Failed to refresh cache: {}", e),
                }
            }
            Self::Clear => {
                if cache.clear().await? {
                    println!("Cache cleared");
                } else {
                    println!("Cache was already empty");
                }
            }
        }

        Ok(())
    }
}
