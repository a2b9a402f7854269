/// Channel id extraction from free-text URL hints
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::{ChannelIdExtractor, ChannelLookup, ProviderError, ProviderResult};
use crate::models::ChannelId;

/// What a URL hint refers to, before any remote lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelHint {
    /// The hint already names the channel id
    ChannelId(ChannelId),
    /// `@handle`, without the leading `@`
    Handle(String),
    /// Legacy `/user/<name>` URL
    Username(String),
    /// A video belonging to the channel
    Video(String),
    /// Some other YouTube page, e.g. `/c/<custom>`
    Page(Url),
}

/// Extracts channel ids from channel, handle, user, video and custom URLs
pub struct UrlChannelIdExtractor<L> {
    lookup: L,
    channel_id_pattern: Regex,
    handle_pattern: Regex,
    video_id_pattern: Regex,
}

impl<L: ChannelLookup> UrlChannelIdExtractor<L> {
    pub fn new(lookup: L) -> ProviderResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ProviderError::Configuration(e.to_string()))
        };

        Ok(Self {
            lookup,
            channel_id_pattern: compile(r"^UC[A-Za-z0-9_-]{22}$")?,
            handle_pattern: compile(r"^@[A-Za-z0-9._-]{3,30}$")?,
            video_id_pattern: compile(r"^[A-Za-z0-9_-]{11}$")?,
        })
    }

    /// Classify a hint without touching the network
    pub fn parse_hint(&self, hint: &str) -> Option<ChannelHint> {
        let hint = hint.trim();
        if hint.is_empty() {
            return None;
        }

        if self.channel_id_pattern.is_match(hint) {
            return Some(ChannelHint::ChannelId(ChannelId::new(hint)));
        }
        if self.handle_pattern.is_match(hint) {
            return Some(ChannelHint::Handle(hint[1..].to_string()));
        }

        let url = if hint.contains("://") {
            Url::parse(hint).ok()?
        } else {
            Url::parse(&format!("https://{}", hint)).ok()?
        };
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let host = url.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        if host == "youtu.be" {
            return segments
                .first()
                .filter(|id| self.video_id_pattern.is_match(id))
                .map(|id| ChannelHint::Video(id.to_string()));
        }

        if host != "youtube.com" && !host.ends_with(".youtube.com") {
            return None;
        }

        match segments.as_slice() {
            [] => None,
            ["channel", id, ..] => Some(id)
                .filter(|id| self.channel_id_pattern.is_match(id))
                .map(|id| ChannelHint::ChannelId(ChannelId::new(*id))),
            ["user", name, ..] => Some(ChannelHint::Username(name.to_string())),
            ["watch", ..] => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .filter(|id| self.video_id_pattern.is_match(id))
                .map(ChannelHint::Video),
            ["shorts" | "live" | "embed", id, ..] => Some(id)
                .filter(|id| self.video_id_pattern.is_match(id))
                .map(|id| ChannelHint::Video(id.to_string())),
            [first, ..] if self.handle_pattern.is_match(first) => {
                Some(ChannelHint::Handle(first[1..].to_string()))
            }
            _ => Some(ChannelHint::Page(url.clone())),
        }
    }
}

#[async_trait]
impl<L: ChannelLookup> ChannelIdExtractor for UrlChannelIdExtractor<L> {
    async fn extract_channel_id(&self, hint: &str) -> ProviderResult<Option<ChannelId>> {
        let parsed = match self.parse_hint(hint) {
            Some(parsed) => parsed,
            None => {
                debug!("No channel reference in hint: {}", hint);
                return Ok(None);
            }
        };
        debug!("Parsed channel hint: {:?}", parsed);

        let channel_id = match parsed {
            ChannelHint::ChannelId(id) => Some(id),
            ChannelHint::Handle(handle) => self.lookup.channel_id_for_handle(&handle).await?,
            ChannelHint::Username(name) => self.lookup.channel_id_for_username(&name).await?,
            ChannelHint::Video(video_id) => self.lookup.channel_id_for_video(&video_id).await?,
            ChannelHint::Page(url) => self.lookup.channel_id_from_page(&url).await?,
        };

        Ok(channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const CHANNEL: &str = "UC0123456789abcdefghijkl";

    #[derive(Default)]
    struct RecordingLookup {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingLookup {
        fn record(&self, call: String) -> ProviderResult<Option<ChannelId>> {
            self.calls.lock().unwrap().push(call);
            Ok(Some(ChannelId::from(CHANNEL)))
        }
    }

    #[async_trait]
    impl ChannelLookup for RecordingLookup {
        async fn channel_id_for_handle(&self, handle: &str) -> ProviderResult<Option<ChannelId>> {
            self.record(format!("handle:{}", handle))
        }

        async fn channel_id_for_username(&self, username: &str) -> ProviderResult<Option<ChannelId>> {
            self.record(format!("user:{}", username))
        }

        async fn channel_id_for_video(&self, video_id: &str) -> ProviderResult<Option<ChannelId>> {
            self.record(format!("video:{}", video_id))
        }

        async fn channel_id_from_page(&self, url: &Url) -> ProviderResult<Option<ChannelId>> {
            self.record(format!("page:{}", url))
        }
    }

    fn extractor() -> UrlChannelIdExtractor<RecordingLookup> {
        UrlChannelIdExtractor::new(RecordingLookup::default()).unwrap()
    }

    #[test]
    fn test_bare_channel_id() {
        assert_eq!(
            extractor().parse_hint(&format!("  {}  ", CHANNEL)),
            Some(ChannelHint::ChannelId(ChannelId::from(CHANNEL)))
        );
    }

    #[test]
    fn test_channel_urls() {
        let extractor = extractor();
        for hint in [
            format!("https://www.youtube.com/channel/{}", CHANNEL),
            format!("youtube.com/channel/{}/videos", CHANNEL),
            format!("http://m.youtube.com/channel/{}?view=0", CHANNEL),
        ] {
            assert_eq!(
                extractor.parse_hint(&hint),
                Some(ChannelHint::ChannelId(ChannelId::from(CHANNEL))),
                "hint: {}",
                hint
            );
        }
    }

    #[test]
    fn test_indirect_references() {
        let extractor = extractor();

        assert_eq!(
            extractor.parse_hint("@JustinGuitar"),
            Some(ChannelHint::Handle("JustinGuitar".to_string()))
        );
        assert_eq!(
            extractor.parse_hint("https://www.youtube.com/@JustinGuitar/featured"),
            Some(ChannelHint::Handle("JustinGuitar".to_string()))
        );
        assert_eq!(
            extractor.parse_hint("https://www.youtube.com/user/paulgilbert"),
            Some(ChannelHint::Username("paulgilbert".to_string()))
        );
        assert_eq!(
            extractor.parse_hint("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some(ChannelHint::Video("dQw4w9WgXcQ".to_string()))
        );
        assert_eq!(
            extractor.parse_hint("https://youtu.be/dQw4w9WgXcQ"),
            Some(ChannelHint::Video("dQw4w9WgXcQ".to_string()))
        );
        assert_eq!(
            extractor.parse_hint("youtube.com/shorts/dQw4w9WgXcQ"),
            Some(ChannelHint::Video("dQw4w9WgXcQ".to_string()))
        );
        assert!(matches!(
            extractor.parse_hint("https://www.youtube.com/c/GuitarLessons365"),
            Some(ChannelHint::Page(_))
        ));
    }

    #[test]
    fn test_unusable_hints() {
        let extractor = extractor();
        for hint in [
            "",
            "   ",
            "not a url at all",
            "https://vimeo.com/channel/UC0123456789abcdefghijkl",
            "https://www.youtube.com/",
            "https://www.youtube.com/channel/too-short",
            "https://www.youtube.com/watch?list=abc",
            "https://notyoutube.com/@someone",
            "ftp://youtube.com/c/GuitarLessons365",
            "file://youtube.com/channel/UC0123456789abcdefghijkl",
        ] {
            assert_eq!(extractor.parse_hint(hint), None, "hint: {}", hint);
        }
    }

    #[tokio::test]
    async fn test_direct_id_needs_no_lookup() {
        let extractor = extractor();
        let id = extractor
            .extract_channel_id(&format!("https://youtube.com/channel/{}", CHANNEL))
            .await
            .unwrap();

        assert_eq!(id, Some(ChannelId::from(CHANNEL)));
        assert!(extractor.lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookups_are_dispatched() {
        let extractor = extractor();
        extractor.extract_channel_id("@riffmaster").await.unwrap();
        extractor
            .extract_channel_id("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        extractor
            .extract_channel_id("https://www.youtube.com/c/GuitarLessons365")
            .await
            .unwrap();

        let calls = extractor.lookup.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "handle:riffmaster".to_string(),
                "video:dQw4w9WgXcQ".to_string(),
                "page:https://www.youtube.com/c/GuitarLessons365".to_string(),
            ]
        );
    }
}
