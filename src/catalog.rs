//! Wiring of stores, YouTube client and services

use std::sync::Arc;
use tracing::{info, warn};

use crate::browse::ChannelBrowser;
use crate::config::Config;
use crate::identify::{ChannelDetailResolver, ChannelIdentifier, SuggestionService};
use crate::predictions::PredictionService;
use crate::store::{CatalogStore, FileStore};
use crate::youtube::{
    ChannelIdExtractor, ChannelProvider, MissingApiKey, UrlChannelIdExtractor, YouTubeDataClient,
};
use crate::{CatalogError, Result};

/// Every catalog operation behind one handle
#[derive(Clone)]
pub struct Catalog {
    config: Arc<Config>,
    browser: ChannelBrowser,
    identifier: ChannelIdentifier,
    suggestions: SuggestionService,
    predictions: PredictionService,
}

impl Catalog {
    /// Open the file store in `config.store.data_dir` and connect to YouTube
    /// when an API key is configured
    pub async fn open(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        let store = Arc::new(FileStore::open(config.store.data_dir.clone()).await?);

        let provider: Arc<dyn ChannelProvider>;
        let extractor: Arc<dyn ChannelIdExtractor>;
        if config.youtube.api_key().is_some() {
            let client = YouTubeDataClient::new(&config.youtube)?;
            info!("📡 YouTube Data API at {}", config.youtube.api_endpoint);
            provider = Arc::new(client.clone());
            extractor = Arc::new(UrlChannelIdExtractor::new(client)?);
        } else {
            warn!("⚠️ No YouTube API key configured, only listed channels can be identified");
            provider = Arc::new(MissingApiKey);
            extractor = Arc::new(UrlChannelIdExtractor::new(MissingApiKey)?);
        }

        Ok(Self::from_parts(config, store, provider, extractor))
    }

    /// Assemble a catalog from already constructed collaborators
    pub fn from_parts<S>(
        config: Config,
        store: Arc<S>,
        provider: Arc<dyn ChannelProvider>,
        extractor: Arc<dyn ChannelIdExtractor>,
    ) -> Self
    where
        S: CatalogStore + 'static,
    {
        let resolver = ChannelDetailResolver::new(store.clone(), store.clone(), provider);

        Self {
            config: Arc::new(config),
            browser: ChannelBrowser::new(store.clone()),
            identifier: ChannelIdentifier::new(extractor, resolver.clone(), store.clone()),
            suggestions: SuggestionService::new(store.clone(), resolver),
            predictions: PredictionService::new(store),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn browser(&self) -> &ChannelBrowser {
        &self.browser
    }

    pub fn identifier(&self) -> &ChannelIdentifier {
        &self.identifier
    }

    pub fn suggestions(&self) -> &SuggestionService {
        &self.suggestions
    }

    pub fn predictions(&self) -> &PredictionService {
        &self.predictions
    }
}
