// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs as async_fs;
use tracing::debug;

use crate::channel::{Channel, ChannelList};

/// The persisted channel list and when it was fetched.
///
/// Field names match the keys the list was historically stored under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    #[serde(rename = "channelsCache")]
    pub channels: Vec<Channel>,
    #[serde(rename = "channelsCacheTime")]
    pub fetched_at_epoch_ms: i64,
}

impl CacheRecord {
    pub fn new(channels: &ChannelList, fetched_at_epoch_ms: i64) -> Self {
        Self {
            channels: channels.to_vec(),
            fetched_at_epoch_ms,
        }
    }

    pub fn age(&self, now_epoch_ms: i64) -> Duration {
        let elapsed = now_epoch_ms.saturating_sub(self.fetched_at_epoch_ms);
        Duration::from_millis(elapsed.max(0) as u64)
    }

    pub fn is_stale(&self, now_epoch_ms: i64, window: Duration) -> bool {
        self.age(now_epoch_ms) > window
    }
}

/// File-backed store for a single [`CacheRecord`].
#[derive(Debug, Clone)]
pub struct CacheManager {
    path: PathBuf,
}

impl CacheManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been cached yet; `Err` when the file exists
    /// but cannot be read or parsed.
    pub async fn read(&self) -> Result<Option<CacheRecord>> {
        if !async_fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read cache file: {}", self.path.display()))?;

        let record: CacheRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache JSON: {}", self.path.display()))?;

        Ok(Some(record))
    }

    /// Replaces the cache file in one step: written to a sibling temp file
    /// and renamed over the old one, so readers never see half a record.
    pub async fn write(&self, record: &CacheRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            async_fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(record)
            .with_context(|| "Failed to serialize cache data")?;

        let tmp_path = self.path.with_extension("json.tmp");
        async_fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write cache file: {}", tmp_path.display()))?;
        async_fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace cache file: {}", self.path.display()))?;

        debug!(
            "Cached {} channel(s) at {}",
            record.channels.len(),
            self.path.display()
        );
        Ok(())
    }

    pub async fn clear(&self) -> Result<bool> {
        if !async_fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(false);
        }
        async_fs::remove_file(&self.path)
            .await
            .with_context(|| format!("Failed to remove cache file: {}", self.path.display()))?;
        Ok(true)
    }
}
