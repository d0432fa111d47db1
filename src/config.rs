// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR: &str = "channel-kiosk";

pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/00levi/lista/refs/heads/main/channel.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Bundled channel list, consulted when the cache is empty.
    pub local_path: PathBuf,
    pub remote_url: Option<String>,
    pub cache_enabled: bool,
    pub local_enabled: bool,
    pub refresh_interval_hours: u64,
    pub request_timeout_secs: u64,
    /// Overrides the default cache file location.
    pub cache_path: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from("channel.json"),
            remote_url: Some(DEFAULT_REMOTE_URL.to_string()),
            cache_enabled: true,
            local_enabled: true,
            refresh_interval_hours: 24,
            request_timeout_secs: 30,
            cache_path: None,
        }
    }
}

impl SourceConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_hours.saturating_mul(60 * 60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "chromium".to_string(),
            args: vec![
                "--kiosk".to_string(),
                "--noerrdialogs".to_string(),
                "--no-first-run".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub menu_timeout_ms: u64,
    pub overlay_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            menu_timeout_ms: 5000,
            overlay_timeout_ms: 4000,
        }
    }
}

impl UiConfig {
    pub fn menu_timeout(&self) -> Duration {
        Duration::from_millis(self.menu_timeout_ms)
    }

    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_millis(self.overlay_timeout_ms)
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Where the channel cache lives unless overridden.
    pub fn cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.source.cache_path {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;
        Ok(cache_dir.join(APP_DIR).join("channels.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            remote_url = "http://example.com/channels.json"
            local_enabled = false

            [ui]
            menu_timeout_ms = 8000
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source.remote_url.as_deref(),
            Some("http://example.com/channels.json")
        );
        assert!(!config.source.local_enabled);
        assert!(config.source.cache_enabled);
        assert_eq!(config.source.refresh_interval(), Duration::from_secs(86_400));
        assert_eq!(config.ui.menu_timeout(), Duration::from_secs(8));
        assert_eq!(config.ui.overlay_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.player.command = "mpv".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.player.command, "mpv");
        assert_eq!(loaded.source.local_path, PathBuf::from("channel.json"));
    }

    #[test]
    fn test_huge_refresh_interval_saturates() {
        let config: Config = toml::from_str(
            r#"
            [source]
            refresh_interval_hours = 9223372036854775807
            "#,
        )
        .unwrap();
        assert_eq!(
            config.source.refresh_interval(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ui.menu_timeout_ms, 5000);
    }
}
