//! API request handlers

use serde_json::Value;
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::{
    ChannelId, ChannelIdentification, ChannelQuery, ChannelRecord, Language, ProgrammingGridEntry,
    ResolvedChannel, UserId,
};
use crate::presentation::{
    truncate_channel, truncate_identification, truncate_resolved, PublishPredictionView,
};
use crate::Result;

/// Handle health check requests
pub async fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "guitar-catalog",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// One page of listed channels with truncated descriptions
pub async fn list_channels(catalog: &Catalog, query: &ChannelQuery) -> Result<Vec<ChannelRecord>> {
    let max_chars = catalog.config().presentation.description_max_chars;
    let channels = catalog.browser().channels(query).await?;
    Ok(channels
        .into_iter()
        .map(|channel| truncate_channel(channel, max_chars))
        .collect())
}

/// A single listed channel, `None` when it is not in the catalog
pub async fn get_channel(catalog: &Catalog, channel_id: &ChannelId) -> Result<Option<ChannelRecord>> {
    let max_chars = catalog.config().presentation.description_max_chars;
    let channel = catalog.browser().channel(channel_id).await?;
    Ok(channel.map(|channel| truncate_channel(channel, max_chars)))
}

pub async fn channel_count(catalog: &Catalog) -> Result<usize> {
    catalog.browser().channel_count().await
}

pub async fn languages(catalog: &Catalog) -> Result<Vec<Language>> {
    catalog.browser().languages().await
}

/// Identify a channel from a URL hint
pub async fn identify_channel(catalog: &Catalog, url_hint: &str) -> Result<ChannelIdentification> {
    let identification = catalog.identifier().identify(url_hint).await?;
    Ok(truncate_identification(
        identification,
        catalog.config().presentation.description_max_chars,
    ))
}

/// Single channel prediction, falling back to configured defaults
pub async fn channel_prediction(
    catalog: &Catalog,
    channel_id: &ChannelId,
    min_gradient: Option<f64>,
    filter_below_average: Option<bool>,
) -> Result<Option<PublishPredictionView>> {
    let defaults = &catalog.config().predictions;
    catalog
        .predictions()
        .single_channel_prediction(
            channel_id,
            min_gradient.unwrap_or(defaults.min_gradient),
            filter_below_average.unwrap_or(defaults.filter_below_average),
        )
        .await
}

/// Weekly programming grid, sorted by day then hour
pub async fn programming_grid(
    catalog: &Catalog,
    min_gradient: Option<f64>,
) -> Result<Vec<ProgrammingGridEntry>> {
    let min_gradient = min_gradient.unwrap_or(catalog.config().predictions.min_gradient);
    let mut grid = catalog.predictions().weekly_programming_grid(min_gradient).await?;
    grid.sort_by_key(|entry| entry.weekstamp);
    Ok(grid)
}

/// Record a suggestion; any failure, or a missing user, reports `false`
pub async fn suggest_channel(catalog: &Catalog, channel_id: ChannelId, user: Option<UserId>) -> bool {
    let Some(user) = user else {
        return false;
    };

    match catalog.suggestions().suggest_channel(channel_id, &user).await {
        Ok(()) => true,
        Err(e) => {
            warn!("❌ Failed to store suggestion from {}: {}", user, e);
            false
        }
    }
}

/// Resolve suggested channels for an authenticated user
pub async fn channel_suggestions(
    catalog: &Catalog,
    ids: &[ChannelId],
    user: Option<UserId>,
) -> Result<Option<Vec<ResolvedChannel>>> {
    let max_chars = catalog.config().presentation.description_max_chars;
    let resolved = catalog.suggestions().channel_suggestions(ids, user.as_ref()).await?;

    Ok(resolved.map(|channels| {
        channels
            .into_iter()
            .map(|channel| truncate_resolved(channel, max_chars))
            .collect()
    }))
}
