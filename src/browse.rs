//! Read-only browsing of the listed catalog

use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{ChannelId, ChannelQuery, ChannelRecord, Language};
use crate::store::ChannelCatalog;
use crate::Result;

/// Largest page a single listing returns
pub const MAX_PAGE_SIZE: usize = 100;

/// Paged listing, single lookup, count and languages of listed channels
#[derive(Clone)]
pub struct ChannelBrowser {
    catalog: Arc<dyn ChannelCatalog>,
}

impl ChannelBrowser {
    pub fn new(catalog: Arc<dyn ChannelCatalog>) -> Self {
        Self { catalog }
    }

    /// One page of listed channels. `take` is capped at [`MAX_PAGE_SIZE`].
    pub async fn channels(&self, query: &ChannelQuery) -> Result<Vec<ChannelRecord>> {
        let query = ChannelQuery {
            take: query.take.min(MAX_PAGE_SIZE),
            ..query.clone()
        };
        if query.take == 0 {
            return Ok(Vec::new());
        }

        let channels = self.catalog.list_channels(&query).await?;
        info!(
            "📚 Listed {} channels (sort {:?}, skip {}, language {})",
            channels.len(),
            query.sort_by,
            query.skip,
            query.language.as_deref().unwrap_or("any")
        );
        Ok(channels)
    }

    pub async fn channel(&self, id: &ChannelId) -> Result<Option<ChannelRecord>> {
        let channel = self.catalog.get_channel(id).await?;
        if channel.is_none() {
            debug!("Channel {} is not listed", id);
        }
        Ok(channel)
    }

    pub async fn channel_count(&self) -> Result<usize> {
        Ok(self.catalog.count_channels().await?)
    }

    pub async fn languages(&self) -> Result<Vec<Language>> {
        Ok(self.catalog.get_languages().await?)
    }
}
