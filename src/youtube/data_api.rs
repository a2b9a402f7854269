/// YouTube Data API v3 client
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{ChannelLookup, ChannelProvider, ProviderError, ProviderResult};
use crate::config::YouTubeConfig;
use crate::models::{ChannelId, ChannelRecord};

/// Largest id list the channels endpoint accepts in one request
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Client for the channels and videos endpoints of the YouTube Data API
#[derive(Clone)]
pub struct YouTubeDataClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_ids_per_request: usize,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    snippet: Option<ChannelSnippet>,
    #[serde(default)]
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    default_language: Option<String>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    default: Option<Thumbnail>,
    #[serde(default)]
    medium: Option<Thumbnail>,
    #[serde(default)]
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

// the API reports counts as decimal strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    #[serde(default)]
    view_count: Option<String>,
    #[serde(default)]
    subscriber_count: Option<String>,
    #[serde(default)]
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    channel_id: String,
}

impl From<ChannelItem> for ChannelRecord {
    fn from(item: ChannelItem) -> Self {
        let mut record = ChannelRecord::new(item.id, "", "");

        if let Some(snippet) = item.snippet {
            record.title = snippet.title.unwrap_or_default();
            record.description = snippet.description.unwrap_or_default();
            record.published_at = snippet.published_at;
            record.country = snippet.country;
            record.language = snippet.default_language;
            record.thumbnail = snippet
                .thumbnails
                .and_then(|t| t.high.or(t.medium).or(t.default))
                .map(|t| t.url);
        }

        if let Some(statistics) = item.statistics {
            let count = |value: Option<String>| value.and_then(|v| v.parse::<u64>().ok());
            record.views = count(statistics.view_count);
            record.subscribers = count(statistics.subscriber_count);
            record.video_count = count(statistics.video_count);
        }

        record
    }
}

impl YouTubeDataClient {
    /// Create a new client; an API key is required
    pub fn new(config: &YouTubeConfig) -> ProviderResult<Self> {
        let api_key = config
            .api_key()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Configuration("YouTube API key required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            api_key,
            max_ids_per_request: config.max_ids_per_request.clamp(1, MAX_IDS_PER_REQUEST),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let url = format!("{}/{}", self.endpoint, resource);
        debug!("Requesting {} from YouTube Data API", resource);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// Fetch snippet and statistics for the given channels.
    ///
    /// Ids are deduplicated and sent in pages of at most
    /// `max_ids_per_request`; an empty input makes no request.
    pub async fn fetch_channels(&self, ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .map(ChannelId::as_str)
            .collect();

        let mut channels = Vec::new();
        for page in unique.chunks(self.max_ids_per_request) {
            let id_list = page.join(",");
            let response: ListResponse<ChannelItem> = self
                .get_json("channels", &[("part", "snippet,statistics"), ("id", id_list.as_str())])
                .await?;
            channels.extend(response.items.into_iter().map(ChannelRecord::from));
        }

        info!(
            "📺 YouTube returned {} of {} requested channels",
            channels.len(),
            unique.len()
        );
        Ok(channels)
    }

    async fn lookup_channel_id(&self, filter: &str, value: &str) -> ProviderResult<Option<ChannelId>> {
        let response: ListResponse<IdItem> = self
            .get_json("channels", &[("part", "id"), (filter, value)])
            .await?;
        Ok(response.items.into_iter().next().map(|item| ChannelId::new(item.id)))
    }
}

#[async_trait]
impl ChannelProvider for YouTubeDataClient {
    async fn get_channel_details(&self, ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>> {
        self.fetch_channels(ids).await
    }
}

#[async_trait]
impl ChannelLookup for YouTubeDataClient {
    async fn channel_id_for_handle(&self, handle: &str) -> ProviderResult<Option<ChannelId>> {
        self.lookup_channel_id("forHandle", handle).await
    }

    async fn channel_id_for_username(&self, username: &str) -> ProviderResult<Option<ChannelId>> {
        self.lookup_channel_id("forUsername", username).await
    }

    async fn channel_id_for_video(&self, video_id: &str) -> ProviderResult<Option<ChannelId>> {
        let response: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;
        Ok(response
            .items
            .into_iter()
            .find_map(|item| item.snippet)
            .map(|snippet| ChannelId::new(snippet.channel_id)))
    }

    async fn channel_id_from_page(&self, url: &Url) -> ProviderResult<Option<ChannelId>> {
        debug!("Fetching channel page {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let html = response.text().await?;
        Ok(channel_id_from_html(&html))
    }
}

/// Read the owning channel id from a YouTube page's markup
pub fn channel_id_from_html(html: &str) -> Option<ChannelId> {
    let document = Html::parse_document(html);

    for selector in [r#"meta[itemprop="channelId"]"#, r#"meta[itemprop="identifier"]"#] {
        let selector = Selector::parse(selector).ok()?;
        if let Some(content) = document
            .select(&selector)
            .filter_map(|element| element.value().attr("content"))
            .find(|content| content.starts_with("UC"))
        {
            return Some(ChannelId::new(content));
        }
    }

    let canonical = Selector::parse(r#"link[rel="canonical"]"#).ok()?;
    document
        .select(&canonical)
        .filter_map(|element| element.value().attr("href"))
        .find_map(|href| href.split("/channel/").nth(1))
        .map(|rest| rest.split(|c| c == '/' || c == '?').next().unwrap_or(rest))
        .filter(|id| id.starts_with("UC"))
        .map(ChannelId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_item_conversion() {
        let json = r#"{
            "items": [{
                "id": "UCabc",
                "snippet": {
                    "title": "Blues Licks Daily",
                    "description": "Learn a lick a day",
                    "publishedAt": "2015-03-01T10:00:00Z",
                    "country": "US",
                    "defaultLanguage": "en",
                    "thumbnails": {
                        "default": {"url": "https://img/default.jpg"},
                        "high": {"url": "https://img/high.jpg"}
                    }
                },
                "statistics": {"viewCount": "1200", "subscriberCount": "87", "videoCount": "not-a-number"}
            }]
        }"#;

        let response: ListResponse<ChannelItem> = serde_json::from_str(json).unwrap();
        let record = ChannelRecord::from(response.items.into_iter().next().unwrap());

        assert_eq!(record.id, ChannelId::from("UCabc"));
        assert_eq!(record.title, "Blues Licks Daily");
        assert_eq!(record.thumbnail.as_deref(), Some("https://img/high.jpg"));
        assert_eq!(record.views, Some(1200));
        assert_eq!(record.subscribers, Some(87));
        assert_eq!(record.video_count, None);
        assert_eq!(record.language.as_deref(), Some("en"));
        assert!(record.published_at.is_some());
    }

    #[test]
    fn test_missing_items_is_empty() {
        let response: ListResponse<ChannelItem> =
            serde_json::from_str(r#"{"kind":"youtube#channelListResponse"}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_channel_id_from_meta() {
        let html = r#"<html><head>
            <meta itemprop="channelId" content="UCmeta0000000000000000000">
        </head><body></body></html>"#;

        assert_eq!(
            channel_id_from_html(html),
            Some(ChannelId::from("UCmeta0000000000000000000"))
        );
    }

    #[test]
    fn test_channel_id_from_canonical_link() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://www.youtube.com/channel/UCcanon000000000000000000?foo=1">
        </head></html>"#;

        assert_eq!(
            channel_id_from_html(html),
            Some(ChannelId::from("UCcanon000000000000000000"))
        );
    }

    #[test]
    fn test_page_without_channel() {
        assert_eq!(channel_id_from_html("<html><body>nothing</body></html>"), None);
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = YouTubeConfig {
            api_key: None,
            ..YouTubeConfig::default()
        };
        assert!(matches!(
            YouTubeDataClient::new(&config),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let config = YouTubeConfig {
            api_key: Some("key".to_string()),
            // nothing listens here, any request would fail
            api_endpoint: "http://127.0.0.1:9".to_string(),
            ..YouTubeConfig::default()
        };
        let client = YouTubeDataClient::new(&config).unwrap();

        assert!(client.fetch_channels(&[]).await.unwrap().is_empty());
    }
}
