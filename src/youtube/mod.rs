//! YouTube integration: channel metadata provider and channel id extraction

pub mod data_api;
pub mod extractor;

pub use data_api::YouTubeDataClient;
pub use extractor::{ChannelHint, UrlChannelIdExtractor};

use async_trait::async_trait;
use url::Url;

use crate::models::{ChannelId, ChannelRecord};

/// Result type for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Error types for the remote channel provider
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Remote source of channel metadata
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Fetch details for a batch of ids; ids unknown to the provider are
    /// absent from the result
    async fn get_channel_details(&self, ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>>;
}

/// Turns free text into a channel id
#[async_trait]
pub trait ChannelIdExtractor: Send + Sync {
    async fn extract_channel_id(&self, hint: &str) -> ProviderResult<Option<ChannelId>>;
}

/// Remote lookups needed to turn indirect references into channel ids
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    async fn channel_id_for_handle(&self, handle: &str) -> ProviderResult<Option<ChannelId>>;

    async fn channel_id_for_username(&self, username: &str) -> ProviderResult<Option<ChannelId>>;

    async fn channel_id_for_video(&self, video_id: &str) -> ProviderResult<Option<ChannelId>>;

    /// Fetch a YouTube page and read the owning channel id from its markup
    async fn channel_id_from_page(&self, url: &Url) -> ProviderResult<Option<ChannelId>>;
}

/// Stand-in used when no API key is configured; every remote call fails
/// with [`ProviderError::Configuration`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingApiKey;

impl MissingApiKey {
    fn error<T>(&self) -> ProviderResult<T> {
        Err(ProviderError::Configuration(
            "YouTube API key required for remote lookups".to_string(),
        ))
    }
}

#[async_trait]
impl ChannelProvider for MissingApiKey {
    async fn get_channel_details(&self, _ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>> {
        self.error()
    }
}

#[async_trait]
impl ChannelLookup for MissingApiKey {
    async fn channel_id_for_handle(&self, _handle: &str) -> ProviderResult<Option<ChannelId>> {
        self.error()
    }

    async fn channel_id_for_username(&self, _username: &str) -> ProviderResult<Option<ChannelId>> {
        self.error()
    }

    async fn channel_id_for_video(&self, _video_id: &str) -> ProviderResult<Option<ChannelId>> {
        self.error()
    }

    async fn channel_id_from_page(&self, _url: &Url) -> ProviderResult<Option<ChannelId>> {
        self.error()
    }
}
