//! In-memory store implementation.
//!
//! Keeps every collection in memory behind a shared lock. Used directly by
//! tests and local development, and as the working set behind [`FileStore`].
//!
//! [`FileStore`]: super::FileStore

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    ChannelCatalog, PredictionStore, StoreError, StoreResult, SuggestionStore, TermRepository,
};
use crate::models::{
    ChannelId, ChannelQuery, ChannelRecord, ClassificationTerm, Language, PublishPredictionRecord,
    SuggestionRecord, UserId,
};

/// In-memory store for all catalog collections.
///
/// # Example
/// ```
/// use guitar_catalog::store::{ChannelCatalog, MemoryStore};
/// use guitar_catalog::models::ChannelRecord;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// store.insert_channel(ChannelRecord::new("UC1", "Riffs", "")).await;
/// assert_eq!(store.count_channels().await.unwrap(), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

struct MemoryData {
    channels: HashMap<ChannelId, ChannelRecord>,
    terms: Vec<ClassificationTerm>,
    suggestions: Vec<SuggestionRecord>,
    // kept in insertion order, the grid lists channels in processing order
    predictions: Vec<PublishPredictionRecord>,

    // Connection health
    is_healthy: bool,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            terms: Vec::new(),
            suggestions: Vec::new(),
            predictions: Vec::new(),
            is_healthy: true,
        }
    }
}

impl MemoryData {
    fn check_health(&self) -> StoreResult<()> {
        if self.is_healthy {
            Ok(())
        } else {
            Err(StoreError::Connection("store is unavailable".to_string()))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_channel(&self, channel: ChannelRecord) {
        let mut data = self.data.write().await;
        data.channels.insert(channel.id.clone(), channel);
    }

    pub async fn set_terms(&self, terms: Vec<ClassificationTerm>) {
        self.data.write().await.terms = terms;
    }

    /// Replace the prediction for a channel, or append it when new
    pub async fn upsert_prediction(&self, prediction: PublishPredictionRecord) {
        let mut data = self.data.write().await;
        match data
            .predictions
            .iter()
            .position(|p| p.channel_id == prediction.channel_id)
        {
            Some(index) => data.predictions[index] = prediction,
            None => data.predictions.push(prediction),
        }
    }

    pub async fn insert_suggestion(&self, suggestion: SuggestionRecord) {
        self.data.write().await.suggestions.push(suggestion);
    }

    /// Snapshot of every suggestion, in insertion order
    pub async fn suggestions(&self) -> Vec<SuggestionRecord> {
        self.data.read().await.suggestions.clone()
    }

    /// Snapshot of the catalog sorted by id
    pub async fn channels(&self) -> Vec<ChannelRecord> {
        let data = self.data.read().await;
        let mut channels: Vec<ChannelRecord> = data.channels.values().cloned().collect();
        channels.sort_by(|a, b| a.id.cmp(&b.id));
        channels
    }

    /// Set the health status for testing connection failures.
    pub async fn set_healthy(&self, healthy: bool) {
        self.data.write().await.is_healthy = healthy;
    }
}

#[async_trait]
impl ChannelCatalog for MemoryStore {
    async fn get_channels(&self, ids: &[ChannelId]) -> StoreResult<Vec<ChannelRecord>> {
        let data = self.data.read().await;
        data.check_health()?;

        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| data.channels.get(id).cloned())
            .collect())
    }

    async fn get_channel(&self, id: &ChannelId) -> StoreResult<Option<ChannelRecord>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data.channels.get(id).cloned())
    }

    async fn count_channels(&self) -> StoreResult<usize> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data.channels.len())
    }

    async fn list_channels(&self, query: &ChannelQuery) -> StoreResult<Vec<ChannelRecord>> {
        let data = self.data.read().await;
        data.check_health()?;

        let mut channels: Vec<&ChannelRecord> =
            data.channels.values().filter(|c| query.matches(c)).collect();
        channels.sort_by(|a, b| query.sort_by.compare(a, b));

        Ok(channels
            .into_iter()
            .skip(query.skip)
            .take(query.take)
            .cloned()
            .collect())
    }

    async fn get_languages(&self) -> StoreResult<Vec<Language>> {
        let data = self.data.read().await;
        data.check_health()?;

        let codes: BTreeSet<&str> = data
            .channels
            .values()
            .filter_map(|c| c.language.as_deref())
            .filter(|code| !code.trim().is_empty())
            .collect();
        Ok(codes.into_iter().map(Language::new).collect())
    }
}

#[async_trait]
impl TermRepository for MemoryStore {
    async fn get_all_terms(&self) -> StoreResult<Vec<ClassificationTerm>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data.terms.clone())
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn get_any(&self, ids: &[ChannelId]) -> StoreResult<Vec<SuggestionRecord>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data
            .suggestions
            .iter()
            .filter(|s| ids.contains(&s.channel_id))
            .cloned()
            .collect())
    }

    async fn add_suggestion(&self, channel_id: ChannelId, suggested_by: UserId) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.check_health()?;
        data.suggestions.push(SuggestionRecord {
            channel_id,
            suggested_by,
            suggested_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn get_suggestions_by(&self, user: &UserId) -> StoreResult<Vec<SuggestionRecord>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data
            .suggestions
            .iter()
            .filter(|s| &s.suggested_by == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PredictionStore for MemoryStore {
    async fn get_prediction(&self, id: &ChannelId) -> StoreResult<Option<PublishPredictionRecord>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data.predictions.iter().find(|p| &p.channel_id == id).cloned())
    }

    async fn get_all_predictions(&self) -> StoreResult<Vec<PublishPredictionRecord>> {
        let data = self.data.read().await;
        data.check_health()?;
        Ok(data.predictions.clone())
    }
}
