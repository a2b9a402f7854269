//! API data models

use serde::{Deserialize, Serialize};

use crate::models::{ChannelId, ChannelQuery, ChannelSorting};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Paging of `GET /api/channels`, absent fields take the listing defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsQuery {
    pub sort_by: Option<ChannelSorting>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
    pub language: Option<String>,
}

impl ChannelsQuery {
    pub fn to_query(&self) -> ChannelQuery {
        let defaults = ChannelQuery::default();
        ChannelQuery {
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            skip: self.skip.unwrap_or(defaults.skip),
            take: self.take.unwrap_or(defaults.take),
            language: self
                .language
                .as_deref()
                .map(str::trim)
                .filter(|language| !language.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentifyQuery {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionQuery {
    pub min_gradient: Option<f64>,
    pub filter_below_average: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    pub min_gradient: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub channel_id: ChannelId,
}

/// Comma separated channel ids
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub channel_ids: String,
}

impl SuggestionsQuery {
    pub fn ids(&self) -> Vec<ChannelId> {
        self.channel_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ChannelId::from)
            .collect()
    }
}
