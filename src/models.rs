//! Core data model for channel identification and publish programming

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Opaque channel identifier assigned by YouTube (e.g. `UC...`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of the user proposing a channel, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A channel as shown to users, either from the local catalog or built
/// from a YouTube Data API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: ChannelId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default)]
    pub subscribers: Option<u64>,

    #[serde(default)]
    pub views: Option<u64>,

    #[serde(default)]
    pub video_count: Option<u64>,

    #[serde(default)]
    pub country: Option<String>,

    /// Language code of the channel's content, e.g. `en`
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ChannelRecord {
    /// Minimal record with only the text fields set
    pub fn new(id: impl Into<ChannelId>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            thumbnail: None,
            subscribers: None,
            views: None,
            video_count: None,
            country: None,
            language: None,
            published_at: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Order of a catalog listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelSorting {
    /// Most subscribers first
    #[default]
    Subscribers,
    /// Most views first
    Views,
    /// Most uploads first
    VideoCount,
    /// Most recently founded first
    Founded,
    /// Alphabetical, case-insensitive
    Title,
}

impl ChannelSorting {
    /// Ordering of two channels; ties and missing values fall back to the id
    pub fn compare(&self, a: &ChannelRecord, b: &ChannelRecord) -> Ordering {
        let primary = match self {
            ChannelSorting::Subscribers => b.subscribers.cmp(&a.subscribers),
            ChannelSorting::Views => b.views.cmp(&a.views),
            ChannelSorting::VideoCount => b.video_count.cmp(&a.video_count),
            ChannelSorting::Founded => b.published_at.cmp(&a.published_at),
            ChannelSorting::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for ChannelSorting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "subscribers" => Ok(ChannelSorting::Subscribers),
            "views" => Ok(ChannelSorting::Views),
            "videocount" | "videos" => Ok(ChannelSorting::VideoCount),
            "founded" => Ok(ChannelSorting::Founded),
            "title" => Ok(ChannelSorting::Title),
            other => Err(format!("unknown channel sorting: {}", other)),
        }
    }
}

/// One page of the catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelQuery {
    pub sort_by: ChannelSorting,
    pub skip: usize,
    pub take: usize,
    /// Only channels with this language code; `None` lists every language
    pub language: Option<String>,
}

impl Default for ChannelQuery {
    fn default() -> Self {
        Self {
            sort_by: ChannelSorting::default(),
            skip: 0,
            take: 20,
            language: None,
        }
    }
}

impl ChannelQuery {
    /// Whether `channel` passes the language filter, compared case-insensitively
    pub fn matches(&self, channel: &ChannelRecord) -> bool {
        match &self.language {
            None => true,
            Some(wanted) => channel
                .language
                .as_deref()
                .map_or(false, |language| language.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// A content language present in the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
}

impl Language {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Lowercase token marking a channel as guitar related
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationTerm {
    pub id: String,
}

impl ClassificationTerm {
    pub fn new(term: &str) -> Self {
        Self {
            id: term.trim().to_lowercase(),
        }
    }
}

/// Where a resolved channel came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSource {
    Local,
    Remote,
}

/// A channel record tagged with the source it was resolved from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "channel", rename_all = "lowercase")]
pub enum ChannelDetail {
    /// Already present in the local catalog
    Local(ChannelRecord),
    /// Only known to the YouTube Data API
    Remote(ChannelRecord),
}

impl ChannelDetail {
    pub fn source(&self) -> ChannelSource {
        match self {
            ChannelDetail::Local(_) => ChannelSource::Local,
            ChannelDetail::Remote(_) => ChannelSource::Remote,
        }
    }

    pub fn record(&self) -> &ChannelRecord {
        match self {
            ChannelDetail::Local(record) | ChannelDetail::Remote(record) => record,
        }
    }

    pub fn record_mut(&mut self) -> &mut ChannelRecord {
        match self {
            ChannelDetail::Local(record) | ChannelDetail::Remote(record) => record,
        }
    }
}

/// Output of detail resolution for one channel id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChannel {
    #[serde(flatten)]
    pub detail: ChannelDetail,
    pub is_guitar_channel: bool,
}

impl ResolvedChannel {
    pub fn channel_id(&self) -> &ChannelId {
        &self.detail.record().id
    }

    pub fn source(&self) -> ChannelSource {
        self.detail.source()
    }

    pub fn channel(&self) -> &ChannelRecord {
        self.detail.record()
    }
}

/// Terminal classification of a single identification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentificationStatus {
    NotValid,
    AlreadyListed,
    AlreadySuggested,
    Novel,
}

/// Result of identifying a channel from a URL hint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIdentification {
    pub status: IdentificationStatus,
    pub channel_id: Option<ChannelId>,
    #[serde(flatten)]
    pub resolved: Option<ResolvedChannel>,
}

impl ChannelIdentification {
    pub fn not_valid() -> Self {
        Self {
            status: IdentificationStatus::NotValid,
            channel_id: None,
            resolved: None,
        }
    }

    pub fn with_channel(status: IdentificationStatus, resolved: ResolvedChannel) -> Self {
        Self {
            status,
            channel_id: Some(resolved.channel_id().clone()),
            resolved: Some(resolved),
        }
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }

    pub fn channel(&self) -> Option<&ChannelRecord> {
        self.resolved.as_ref().map(ResolvedChannel::channel)
    }

    pub fn source(&self) -> Option<ChannelSource> {
        self.resolved.as_ref().map(ResolvedChannel::source)
    }

    pub fn is_guitar_channel(&self) -> bool {
        self.resolved.as_ref().map_or(false, |r| r.is_guitar_channel)
    }
}

/// A user's proposal to add a channel to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub channel_id: ChannelId,
    pub suggested_by: UserId,
    #[serde(default)]
    pub suggested_at: Option<DateTime<Utc>>,
}

/// One predicted publishing slot, with how far it deviates from the
/// channel's average upload activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionItem {
    pub day_of_week: u8,
    pub hour_of_day: u8,
    pub deviation_from_average: f64,
}

/// Predicted publish schedule of a channel, items ordered strongest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPredictionRecord {
    #[serde(alias = "id")]
    pub channel_id: ChannelId,
    #[serde(default)]
    pub title: String,
    pub gradient: f64,
    #[serde(default)]
    pub prediction_items: Vec<PredictionItem>,
}

/// (day-of-week, hour-of-day) coordinate of the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weekstamp {
    pub day_of_week: u8,
    pub hour_of_day: u8,
}

impl From<&PredictionItem> for Weekstamp {
    fn from(item: &PredictionItem) -> Self {
        Self {
            day_of_week: item.day_of_week,
            hour_of_day: item.hour_of_day,
        }
    }
}

/// Channel reference listed in a grid slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridChannel {
    pub id: ChannelId,
    pub title: String,
}

/// One occupied slot of the weekly programming grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammingGridEntry {
    #[serde(flatten)]
    pub weekstamp: Weekstamp,
    pub channels: Vec<GridChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_text_fields_become_empty() {
        let record: ChannelRecord =
            serde_json::from_str(r#"{"id":"UC1","title":null,"description":null}"#).unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_identification_json_shape() {
        let resolved = ResolvedChannel {
            detail: ChannelDetail::Remote(ChannelRecord::new("UC1", "Riffs", "Daily riffs")),
            is_guitar_channel: true,
        };
        let identification = ChannelIdentification::with_channel(IdentificationStatus::Novel, resolved);
        let value = serde_json::to_value(&identification).unwrap();

        assert_eq!(value["status"], "Novel");
        assert_eq!(value["channelId"], "UC1");
        assert_eq!(value["source"], "remote");
        assert_eq!(value["isGuitarChannel"], true);
        assert_eq!(value["channel"]["id"], "UC1");
    }

    #[test]
    fn test_channel_sorting() {
        let mut small = ChannelRecord::new("UC1", "zither picks", "");
        small.subscribers = Some(10);
        let mut big = ChannelRecord::new("UC2", "Acoustic Corner", "");
        big.subscribers = Some(5_000);
        let unknown = ChannelRecord::new("UC3", "Bass Lab", "");

        let mut channels = vec![unknown.clone(), small.clone(), big.clone()];
        channels.sort_by(|a, b| ChannelSorting::Subscribers.compare(a, b));
        let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["UC2", "UC1", "UC3"]);

        channels.sort_by(|a, b| ChannelSorting::Title.compare(a, b));
        let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["UC2", "UC3", "UC1"]);

        assert_eq!("video-count".parse::<ChannelSorting>(), Ok(ChannelSorting::VideoCount));
        assert_eq!("Title".parse::<ChannelSorting>(), Ok(ChannelSorting::Title));
        assert!("popularity".parse::<ChannelSorting>().is_err());
    }

    #[test]
    fn test_language_filter_ignores_case() {
        let mut channel = ChannelRecord::new("UC1", "Riffs", "");
        channel.language = Some("en".to_string());
        let query = |language: Option<&str>| ChannelQuery {
            language: language.map(str::to_string),
            ..ChannelQuery::default()
        };

        assert!(query(None).matches(&channel));
        assert!(query(Some("EN")).matches(&channel));
        assert!(!query(Some("de")).matches(&channel));
        assert!(!query(Some("en")).matches(&ChannelRecord::new("UC2", "Riffs", "")));
    }

    #[test]
    fn test_not_valid_has_no_channel() {
        let identification = ChannelIdentification::not_valid();

        assert!(identification.channel().is_none());
        assert!(identification.channel_id().is_none());
        let value = serde_json::to_value(&identification).unwrap();
        assert_eq!(value["status"], "NotValid");
        assert!(value["channelId"].is_null());
        assert!(identification.source().is_none());
        assert!(!identification.is_guitar_channel());
    }
}
