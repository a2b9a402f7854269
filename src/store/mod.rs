//! Store traits for the catalog's persistent collections.
//!
//! Each collection the identification pipeline and the prediction
//! aggregator read from is abstracted behind a focused trait, so services
//! only depend on what they use and tests can swap in [`MemoryStore`].
//!
//! - [`ChannelCatalog`]: channels already listed in the catalog
//! - [`TermRepository`]: the guitar term dictionary
//! - [`SuggestionStore`]: channels proposed by users
//! - [`PredictionStore`]: pre-computed publish schedule predictions

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::models::{
    ChannelId, ChannelQuery, ChannelRecord, ClassificationTerm, Language, PublishPredictionRecord,
    SuggestionRecord, UserId,
};

/// Channels already listed in the catalog
#[async_trait]
pub trait ChannelCatalog: Send + Sync {
    /// Fetch every listed channel whose id is in `ids`; unknown ids are skipped
    async fn get_channels(&self, ids: &[ChannelId]) -> StoreResult<Vec<ChannelRecord>>;

    async fn get_channel(&self, id: &ChannelId) -> StoreResult<Option<ChannelRecord>>;

    async fn count_channels(&self) -> StoreResult<usize>;

    /// One sorted, optionally language-filtered page of the catalog
    async fn list_channels(&self, query: &ChannelQuery) -> StoreResult<Vec<ChannelRecord>>;

    /// Distinct languages of listed channels, channels without one are skipped
    async fn get_languages(&self) -> StoreResult<Vec<Language>>;
}

/// Guitar vocabulary used for classification
#[async_trait]
pub trait TermRepository: Send + Sync {
    async fn get_all_terms(&self) -> StoreResult<Vec<ClassificationTerm>>;
}

/// Channel suggestions submitted by users
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// All suggestions made for any of `ids`
    async fn get_any(&self, ids: &[ChannelId]) -> StoreResult<Vec<SuggestionRecord>>;

    async fn add_suggestion(&self, channel_id: ChannelId, suggested_by: UserId) -> StoreResult<()>;

    async fn get_suggestions_by(&self, user: &UserId) -> StoreResult<Vec<SuggestionRecord>>;
}

/// Per-channel publish schedule predictions
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn get_prediction(&self, id: &ChannelId) -> StoreResult<Option<PublishPredictionRecord>>;

    async fn get_all_predictions(&self) -> StoreResult<Vec<PublishPredictionRecord>>;
}

/// Composite bound for a store backing every collection.
pub trait CatalogStore: ChannelCatalog + TermRepository + SuggestionStore + PredictionStore {}

impl<T> CatalogStore for T where T: ChannelCatalog + TermRepository + SuggestionStore + PredictionStore {}
