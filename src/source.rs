// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs as async_fs;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::cache::{CacheManager, CacheRecord};
use crate::channel::{ChannelList, ListError};
use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("channel cache is corrupt: {0}")]
    CacheCorrupt(String),
    #[error("failed to read local channel list {}: {source}", .path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid channel list: {0}")]
    InvalidList(#[from] ListError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("no remote channel list URL configured")]
    RemoteDisabled,
    #[error("channels unavailable: neither cache nor local list could be loaded")]
    Unavailable,
}

/// Where a list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Local,
    Remote,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Cache => write!(f, "cache"),
            Origin::Local => write!(f, "local file"),
            Origin::Remote => write!(f, "remote"),
        }
    }
}

/// Notifications emitted while a load is in progress, strictly in order.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    ListUpdated {
        channels: ChannelList,
        origin: Origin,
    },
    Unavailable,
}

/// HTTP client for the published channel list.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    url: Url,
}

impl RemoteClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid remote URL: {}", url))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("channel-kiosk/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to build HTTP client")?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch(&self) -> Result<ChannelList, SourceError> {
        debug!("Fetching channel list from {}", self.url);
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let value: serde_json::Value = response.json().await?;
        Ok(ChannelList::from_value(value)?)
    }
}

/// Resolves the channel list from the cache, the local file and the remote
/// endpoint. A tier that is `None` is skipped; with neither cache nor local
/// file the source is remote-only.
#[derive(Debug, Clone)]
pub struct ChannelSource {
    cache: Option<CacheManager>,
    local_path: Option<PathBuf>,
    remote: Option<RemoteClient>,
    refresh_interval: Duration,
}

impl ChannelSource {
    pub fn new(
        cache: Option<CacheManager>,
        local_path: Option<PathBuf>,
        remote: Option<RemoteClient>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            cache,
            local_path,
            remote,
            refresh_interval,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let source = &config.source;

        let cache = if source.cache_enabled {
            Some(CacheManager::new(config.cache_path()?))
        } else {
            None
        };

        let local_path = source.local_enabled.then(|| source.local_path.clone());

        let remote = source
            .remote_url
            .as_deref()
            .map(|url| RemoteClient::new(url, source.request_timeout()))
            .transpose()?;

        Ok(Self::new(cache, local_path, remote, source.refresh_interval()))
    }

    pub fn cache(&self) -> Option<&CacheManager> {
        self.cache.as_ref()
    }

    pub fn remote(&self) -> Option<&RemoteClient> {
        self.remote.as_ref()
    }

    pub async fn load(&self, events: &UnboundedSender<SourceEvent>) -> ChannelList {
        self.load_at(crate::now_epoch_ms(), events).await
    }

    /// Runs the full resolution and returns the final working list, which is
    /// empty when every tier failed.
    pub async fn load_at(&self, now_ms: i64, events: &UnboundedSender<SourceEvent>) -> ChannelList {
        let mut working = ChannelList::default();
        let mut cache_usable = false;

        let record = self.read_cache().await;
        if let Some(record) = &record {
            match ChannelList::validated(record.channels.clone()) {
                Ok(list) => {
                    info!("Loaded {} channel(s) from cache", list.len());
                    working = list;
                    cache_usable = true;
                    emit(events, &working, Origin::Cache);
                }
                Err(e) => warn!("{}", SourceError::CacheCorrupt(e.to_string())),
            }
        }

        if working.is_empty()
            && let Some(path) = &self.local_path
        {
            match read_local(path).await {
                Ok(list) => {
                    info!("Loaded {} channel(s) from {}", list.len(), path.display());
                    working = list;
                    emit(events, &working, Origin::Local);
                }
                Err(e) => warn!("{}", e),
            }
        }

        let mut reported = false;
        let has_fallback_tiers = self.cache.is_some() || self.local_path.is_some();
        if working.is_empty() && has_fallback_tiers {
            warn!("{}", SourceError::Unavailable);
            let _ = events.send(SourceEvent::Unavailable);
            reported = true;
        }

        // A record that yielded no usable list counts as absent.
        let usable_record = record.filter(|_| cache_usable);
        if self.refresh_due(usable_record.as_ref(), now_ms) {
            match self.refresh_at(now_ms).await {
                Ok(list) => {
                    working = list;
                    emit(events, &working, Origin::Remote);
                }
                Err(e) => warn!("Remote refresh failed, keeping current list: {}", e),
            }
        }

        if working.is_empty() && !reported {
            warn!("{}", SourceError::Unavailable);
            let _ = events.send(SourceEvent::Unavailable);
        }

        working
    }

    pub fn refresh_due(&self, record: Option<&CacheRecord>, now_ms: i64) -> bool {
        if self.remote.is_none() {
            return false;
        }
        match record {
            None => true,
            Some(record) => record.is_stale(now_ms, self.refresh_interval),
        }
    }

    /// Fetches the remote list regardless of staleness and, on success,
    /// persists it with `now_ms` as its timestamp.
    pub async fn refresh_at(&self, now_ms: i64) -> Result<ChannelList, SourceError> {
        let remote = self.remote.as_ref().ok_or(SourceError::RemoteDisabled)?;
        let list = remote.fetch().await?;
        info!("Fetched {} channel(s) from {}", list.len(), remote.url());

        if let Some(cache) = &self.cache
            && let Err(e) = cache.write(&CacheRecord::new(&list, now_ms)).await
        {
            warn!("Failed to persist channel cache: {:#}", e);
        }

        Ok(list)
    }

    pub async fn refresh(&self) -> Result<ChannelList, SourceError> {
        self.refresh_at(crate::now_epoch_ms()).await
    }

    async fn read_cache(&self) -> Option<CacheRecord> {
        let cache = self.cache.as_ref()?;
        match cache.read().await {
            Ok(record) => record,
            Err(e) => {
                warn!("{}", SourceError::CacheCorrupt(format!("{:#}", e)));
                None
            }
        }
    }
}

fn emit(events: &UnboundedSender<SourceEvent>, channels: &ChannelList, origin: Origin) {
    let _ = events.send(SourceEvent::ListUpdated {
        channels: channels.clone(),
        origin,
    });
}

async fn read_local(path: &Path) -> Result<ChannelList, SourceError> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::LocalRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ChannelList::from_json(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const NOW: i64 = 1_760_000_000_000;

    fn drain(rx: &mut mpsc::UnboundedReceiver<SourceEvent>) -> Vec<(Option<Origin>, Vec<String>)> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                SourceEvent::ListUpdated { channels, origin } => seen.push((
                    Some(origin),
                    channels.iter().map(|c| c.title.clone()).collect(),
                )),
                SourceEvent::Unavailable => seen.push((None, Vec::new())),
            }
        }
        seen
    }

    fn write_local(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("channel.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    async fn write_cache(cache: &CacheManager, titles: &[&str], at: i64) {
        let list = ChannelList::new(
            titles
                .iter()
                .map(|t| crate::channel::Channel {
                    id: None,
                    title: t.to_string(),
                    iframe: format!("http://cache/{}", t),
                })
                .collect(),
        );
        cache.write(&CacheRecord::new(&list, at)).await.unwrap();
    }

    async fn remote_serving(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/channel.json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn remote_client(server: &MockServer) -> RemoteClient {
        RemoteClient::new(
            &format!("{}/channel.json", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_local_and_remote() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache.json"));
        write_cache(&cache, &["cached"], NOW - 1000).await;
        let local = write_local(dir.path(), r#"[{"title": "local", "iframe": "http://l"}]"#);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let source = ChannelSource::new(
            Some(cache),
            Some(local),
            Some(remote_client(&server)),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let list = source.load_at(NOW, &tx).await;

        assert_eq!(list[0].title, "cached");
        assert_eq!(
            drain(&mut rx),
            vec![(Some(Origin::Cache), vec!["cached".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_local_and_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        std::fs::write(&cache_path, "garbage").unwrap();
        let local = write_local(dir.path(), r#"[{"title": "local", "iframe": "http://l"}]"#);

        let server = MockServer::start().await;
        remote_serving(
            &server,
            200,
            json!([{"id": 1, "title": "remote", "iframe": "http://r"}]),
        )
        .await;

        let source = ChannelSource::new(
            Some(CacheManager::new(&cache_path)),
            Some(local),
            Some(remote_client(&server)),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let list = source.load_at(NOW, &tx).await;

        assert_eq!(list[0].title, "remote");
        assert_eq!(
            drain(&mut rx),
            vec![
                (Some(Origin::Local), vec!["local".to_string()]),
                (Some(Origin::Remote), vec!["remote".to_string()]),
            ]
        );

        let record = CacheManager::new(&cache_path).read().await.unwrap().unwrap();
        assert_eq!(record.fetched_at_epoch_ms, NOW);
        assert_eq!(record.channels[0].title, "remote");
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_exactly_one_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache.json"));
        write_cache(&cache, &["old"], NOW - DAY_MS - 1).await;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channel.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"title": "new", "iframe": "http://n"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = ChannelSource::new(
            Some(cache.clone()),
            None,
            Some(remote_client(&server)),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        source.load_at(NOW, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], (Some(Origin::Remote), vec!["new".to_string()]));
        assert_eq!(cache.read().await.unwrap().unwrap().fetched_at_epoch_ms, NOW);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_list_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        let local = write_local(dir.path(), r#"[{"title": "local", "iframe": "http://l"}]"#);

        for (status, body) in [
            (500, json!([{"title": "x", "iframe": "http://x"}])),
            (200, json!([])),
            (200, json!({"title": "not a list"})),
        ] {
            let server = MockServer::start().await;
            remote_serving(&server, status, body).await;

            let source = ChannelSource::new(
                Some(CacheManager::new(&cache_path)),
                Some(local.clone()),
                Some(remote_client(&server)),
                Duration::from_millis(DAY_MS as u64),
            );
            let (tx, mut rx) = mpsc::unbounded_channel();
            let list = source.load_at(NOW, &tx).await;

            assert_eq!(list[0].title, "local");
            assert_eq!(
                drain(&mut rx),
                vec![(Some(Origin::Local), vec!["local".to_string()])]
            );
            assert!(!cache_path.exists());
        }
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let local = write_local(dir.path(), r#"[{"title": "local", "iframe": "http://l"}]"#);
        let remote = RemoteClient::new("http://127.0.0.1:9/channel.json", Duration::from_secs(1))
            .unwrap();

        let source = ChannelSource::new(
            Some(CacheManager::new(dir.path().join("cache.json"))),
            Some(local),
            Some(remote),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        let list = source.load_at(NOW, &tx).await;
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_then_recovered_by_remote() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        remote_serving(&server, 200, json!([{"title": "r", "iframe": "http://r"}])).await;

        let source = ChannelSource::new(
            Some(CacheManager::new(dir.path().join("cache.json"))),
            Some(dir.path().join("missing.json")),
            Some(remote_client(&server)),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        source.load_at(NOW, &tx).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                (None, vec![]),
                (Some(Origin::Remote), vec!["r".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_only_reports_unavailable_on_failure() {
        let server = MockServer::start().await;
        remote_serving(&server, 404, json!(null)).await;

        let source = ChannelSource::new(
            None,
            None,
            Some(remote_client(&server)),
            Duration::from_millis(DAY_MS as u64),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let list = source.load_at(NOW, &tx).await;

        assert!(list.is_empty());
        assert_eq!(drain(&mut rx), vec![(None, vec![])]);
    }

    #[tokio::test]
    async fn test_refresh_without_remote() {
        let source = ChannelSource::new(None, None, None, Duration::ZERO);
        assert!(matches!(
            source.refresh_at(NOW).await,
            Err(SourceError::RemoteDisabled)
        ));
    }
}
