// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

/// One entry of the channel list as published in `channel.json`.
///
/// `id` is display-only, so any JSON number is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Number>,
    pub title: String,
    pub iframe: String,
}

impl Channel {
    /// Text shown in the menu and the now-playing overlay.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} - {}", id, self.title),
            None => self.title.clone(),
        }
    }

    /// The embed URL with a `t=<epoch_ms>` parameter so the playback surface
    /// never reuses a stale document.
    pub fn playback_url(&self, epoch_ms: i64) -> String {
        let separator = if self.iframe.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.iframe, separator, epoch_ms)
    }

    /// Protocol-relative embeds (`//host/path`) are pinned to `https:`.
    fn with_resolved_scheme(mut self) -> Self {
        let iframe = self.iframe.trim();
        if iframe.starts_with("//") {
            self.iframe = format!("https:{}", iframe);
        }
        self
    }

    fn is_playable(&self) -> bool {
        let iframe = self.iframe.trim();
        !iframe.is_empty() && url::Url::parse(iframe).is_ok()
    }
}

/// Why a channel list payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("channel list is not a JSON array of channels: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("channel list is empty")]
    Empty,
}

/// An immutable ordered list of channels; order is navigation order.
///
/// Lists are shared by reference count and replaced wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelList(Arc<[Channel]>);

impl ChannelList {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self(channels.into())
    }

    /// Parses a channel list payload. Entries without a usable `iframe` URL
    /// are dropped; a payload that leaves nothing playable is rejected.
    pub fn from_json(payload: &str) -> Result<Self, ListError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ListError> {
        let channels: Vec<Channel> = serde_json::from_value(value)?;
        Self::validated(channels)
    }

    /// Keeps entries whose `iframe` is an absolute URL once protocol-relative
    /// embeds are resolved.
    pub fn validated(channels: Vec<Channel>) -> Result<Self, ListError> {
        let total = channels.len();
        let channels: Vec<Channel> = channels
            .into_iter()
            .map(Channel::with_resolved_scheme)
            .filter(Channel::is_playable)
            .collect();

        if channels.len() < total {
            warn!(
                "Dropped {} channel(s) without a valid iframe URL",
                total - channels.len()
            );
        }

        if channels.is_empty() {
            return Err(ListError::Empty);
        }

        Ok(Self::new(channels))
    }

    pub fn to_vec(&self) -> Vec<Channel> {
        self.0.to_vec()
    }
}

impl Deref for ChannelList {
    type Target = [Channel];

    fn deref(&self) -> &[Channel] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: Option<u64>, title: &str, iframe: &str) -> Channel {
        Channel {
            id: id.map(Number::from),
            title: title.to_string(),
            iframe: iframe.to_string(),
        }
    }

    #[test]
    fn test_label_with_and_without_id() {
        assert_eq!(channel(Some(7), "News", "http://x").label(), "7 - News");
        assert_eq!(channel(None, "News", "http://x").label(), "News");
    }

    #[test]
    fn test_playback_url_separator() {
        let plain = channel(None, "A", "http://x/embed");
        assert_eq!(plain.playback_url(42), "http://x/embed?t=42");

        let with_query = channel(None, "B", "http://x/embed?autoplay=1");
        assert_eq!(with_query.playback_url(42), "http://x/embed?autoplay=1&t=42");
    }

    #[test]
    fn test_from_json_accepts_optional_id() {
        let list = ChannelList::from_json(
            r#"[{"id": 1, "title": "A", "iframe": "http://x"}, {"title": "B", "iframe": "http://y"}]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, Some(Number::from(1)));
        assert_eq!(list[1].id, None);
    }

    #[test]
    fn test_any_numeric_id_is_kept() {
        let list = ChannelList::from_json(
            r#"[
                {"id": 1.5, "title": "A", "iframe": "http://x"},
                {"id": -3, "title": "B", "iframe": "http://y"},
                {"title": "C", "iframe": "http://z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list[0].label(), "1.5 - A");
        assert_eq!(list[1].label(), "-3 - B");
        assert_eq!(list[2].label(), "C");
    }

    #[test]
    fn test_protocol_relative_iframe_is_resolved() {
        let list = ChannelList::from_json(
            r#"[{"title": "A", "iframe": "//www.youtube.com/embed/x"}]"#,
        )
        .unwrap();

        assert_eq!(list[0].iframe, "https://www.youtube.com/embed/x");
        assert_eq!(list[0].playback_url(7), "https://www.youtube.com/embed/x?t=7");
    }

    #[test]
    fn test_from_json_rejects_empty_and_non_arrays() {
        assert!(matches!(ChannelList::from_json("[]"), Err(ListError::Empty)));
        assert!(matches!(
            ChannelList::from_json(r#"{"title": "A"}"#),
            Err(ListError::Malformed(_))
        ));
        assert!(matches!(
            ChannelList::from_json("not json"),
            Err(ListError::Malformed(_))
        ));
    }

    #[test]
    fn test_entries_without_iframe_are_dropped() {
        let list = ChannelList::from_json(
            r#"[{"title": "A", "iframe": ""}, {"title": "B", "iframe": "http://y"}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "B");

        assert!(matches!(
            ChannelList::from_json(r#"[{"title": "A", "iframe": "  "}]"#),
            Err(ListError::Empty)
        ));
    }
}
