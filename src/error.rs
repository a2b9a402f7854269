//! Error types shared across the catalog

use crate::store::StoreError;
use crate::youtube::ProviderError;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Infrastructure faults surfaced by the catalog.
///
/// Business outcomes (an unknown URL, a channel that is already listed, a
/// prediction below the quality threshold) are ordinary return values and
/// never show up here.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Channel provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
