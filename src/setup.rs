// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, Text};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{Config, DEFAULT_REMOTE_URL};
use crate::source::RemoteClient;

pub async fn interactive_setup(config_path: &Path) -> Result<()> {
    println!("\n📺 Channel kiosk setup\n");
    println!("The kiosk plays channels from a JSON list of {{ id, title, iframe }} entries.");
    println!("It reads the list from a local cache, a bundled file, and a remote URL.\n");

    let mut config = Config::load_or_default(config_path)?;

    let remote_url = Text::new("Remote channel list URL (leave empty to disable):")
        .with_default(config.source.remote_url.as_deref().unwrap_or(DEFAULT_REMOTE_URL))
        .with_validator(|input: &str| {
            if input.is_empty() || input.starts_with("http://") || input.starts_with("https://") {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    "URL must start with http:// or https://".into(),
                ))
            }
        })
        .prompt()?;
    config.source.remote_url = (!remote_url.is_empty()).then_some(remote_url);

    if let Some(url) = &config.source.remote_url {
        println!("\nTesting remote list...");
        match test_remote(url).await {
            Ok(count) => println!("✅ Found {} channel(s)", count),
            Err(e) => {
                println!("⚠️  Warning: Could not fetch the list: {}", e);
                println!("    The URL will be saved anyway.");
            }
        }
    }

    config.source.local_enabled = Confirm::new("Use a bundled channel file as fallback?")
        .with_default(config.source.local_enabled)
        .prompt()?;

    if config.source.local_enabled {
        let local_path = Text::new("Bundled channel file:")
            .with_default(&config.source.local_path.display().to_string())
            .prompt()?;
        config.source.local_path = PathBuf::from(local_path);
    }

    let command = Text::new("Player command:")
        .with_help_message("Launched with the channel URL, e.g. chromium or mpv")
        .with_default(&config.player.command)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("Player command is required".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    if command != config.player.command {
        config.player.command = command;
        config.player.args = Vec::new();
    }

    save_config(&config, config_path)?;

    println!("\n✅ Configuration saved successfully!");
    println!("Run 'channel-kiosk' to start the kiosk.");

    Ok(())
}

async fn test_remote(url: &str) -> Result<usize> {
    let client = RemoteClient::new(url, Duration::from_secs(10))?;
    let channels = client.fetch().await?;
    Ok(channels.len())
}

fn save_config(config: &Config, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        let backup_path = config_path.with_extension("toml.backup");
        std::fs::copy(config_path, &backup_path)?;
        println!(
            "ℹ️  Existing config backed up to: {}",
            backup_path.display()
        );
    }

    config.save(config_path)?;
    println!("💾 Configuration saved to: {}", config_path.display());

    Ok(())
}
