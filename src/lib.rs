/// Guitar Channel Catalog
///
/// Identifies guitar YouTube channels from free-text URLs, tracks user
/// suggestions for the catalog, and aggregates publish schedule predictions
/// into a weekly programming grid.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod guitar;
pub mod identify;
pub mod models;
pub mod predictions;
pub mod presentation;
pub mod store;
pub mod youtube;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::browse::ChannelBrowser;
pub use crate::catalog::Catalog;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{CatalogError, Result};
pub use crate::guitar::{is_guitar_channel, GuitarTermDictionary, TermCategory};
pub use crate::identify::{ChannelDetailResolver, ChannelIdentifier, SuggestionService};
pub use crate::models::{
    ChannelDetail, ChannelId, ChannelIdentification, ChannelQuery, ChannelRecord, ChannelSorting,
    IdentificationStatus, Language, ProgrammingGridEntry, PublishPredictionRecord, UserId, Weekstamp,
};
pub use crate::predictions::PredictionService;
pub use crate::presentation::{truncate_description, PublishPredictionView};
pub use crate::store::{FileStore, MemoryStore};
pub use crate::youtube::{UrlChannelIdExtractor, YouTubeDataClient};
