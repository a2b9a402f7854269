//! JSON file backed store.
//!
//! Layout of the data directory:
//!
//! - `channels.json`: array of listed channels
//! - `suggestions.json`: array of suggestions, rewritten on every insert
//!   under a write lock; memory only sees a suggestion once it is on disk
//! - `predictions.json`: array of publish predictions
//! - `guitar_terms.txt`: terms file, see [`GuitarTermDictionary`]
//!
//! Missing files are treated as empty collections.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{
    ChannelCatalog, MemoryStore, PredictionStore, StoreResult, SuggestionStore, TermRepository,
};
use crate::guitar::GuitarTermDictionary;
use crate::models::{
    ChannelId, ChannelQuery, ChannelRecord, ClassificationTerm, Language, PublishPredictionRecord,
    SuggestionRecord, UserId,
};

pub const CHANNELS_FILE: &str = "channels.json";
pub const SUGGESTIONS_FILE: &str = "suggestions.json";
pub const PREDICTIONS_FILE: &str = "predictions.json";
pub const TERMS_FILE: &str = "guitar_terms.txt";

/// Store reading its collections from a data directory
#[derive(Clone)]
pub struct FileStore {
    data_dir: PathBuf,
    inner: MemoryStore,
    // held across snapshot, write, rename and the in-memory commit
    suggestions_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Load every collection from `data_dir`
    pub async fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        let inner = MemoryStore::new();

        let channels: Vec<ChannelRecord> = load_json(&data_dir.join(CHANNELS_FILE)).await?;
        let suggestions: Vec<SuggestionRecord> = load_json(&data_dir.join(SUGGESTIONS_FILE)).await?;
        let predictions: Vec<PublishPredictionRecord> =
            load_json(&data_dir.join(PREDICTIONS_FILE)).await?;
        let terms = load_terms(&data_dir.join(TERMS_FILE)).await?;

        info!(
            "📂 Opened store at {}: {} channels, {} suggestions, {} predictions, {} terms",
            data_dir.display(),
            channels.len(),
            suggestions.len(),
            predictions.len(),
            terms.len()
        );

        for channel in channels {
            inner.insert_channel(channel).await;
        }
        for suggestion in suggestions {
            inner.insert_suggestion(suggestion).await;
        }
        for prediction in predictions {
            inner.upsert_prediction(prediction).await;
        }
        inner.set_terms(terms).await;

        Ok(Self {
            data_dir,
            inner,
            suggestions_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Atomically replace the suggestions file with `suggestions`.
    /// Callers hold `suggestions_lock`.
    async fn persist_suggestions(&self, suggestions: &[SuggestionRecord]) -> StoreResult<()> {
        fs::create_dir_all(&self.data_dir).await?;

        let path = self.data_dir.join(SUGGESTIONS_FILE);
        let tmp_path = self
            .data_dir
            .join(format!("{}.{}.tmp", SUGGESTIONS_FILE, std::process::id()));

        let written = async {
            fs::write(&tmp_path, serde_json::to_vec_pretty(suggestions)?).await?;
            fs::rename(&tmp_path, &path).await?;
            StoreResult::Ok(())
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                debug!("No temporary file to clean up at {}: {}", tmp_path.display(), cleanup);
            }
            warn!("❌ Failed to write {}: {}", path.display(), e);
            return Err(e);
        }

        debug!("💾 Wrote {} suggestions to {}", suggestions.len(), path.display());
        Ok(())
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !fs::try_exists(path).await? {
        debug!("No data file at {}", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read(path).await?;
    Ok(serde_json::from_slice(&content)?)
}

async fn load_terms(path: &Path) -> StoreResult<Vec<ClassificationTerm>> {
    if !fs::try_exists(path).await? {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    Ok(GuitarTermDictionary::parse(&content).classification_terms())
}

#[async_trait]
impl ChannelCatalog for FileStore {
    async fn get_channels(&self, ids: &[ChannelId]) -> StoreResult<Vec<ChannelRecord>> {
        self.inner.get_channels(ids).await
    }

    async fn get_channel(&self, id: &ChannelId) -> StoreResult<Option<ChannelRecord>> {
        self.inner.get_channel(id).await
    }

    async fn count_channels(&self) -> StoreResult<usize> {
        self.inner.count_channels().await
    }

    async fn list_channels(&self, query: &ChannelQuery) -> StoreResult<Vec<ChannelRecord>> {
        self.inner.list_channels(query).await
    }

    async fn get_languages(&self) -> StoreResult<Vec<Language>> {
        self.inner.get_languages().await
    }
}

#[async_trait]
impl TermRepository for FileStore {
    async fn get_all_terms(&self) -> StoreResult<Vec<ClassificationTerm>> {
        self.inner.get_all_terms().await
    }
}

#[async_trait]
impl SuggestionStore for FileStore {
    async fn get_any(&self, ids: &[ChannelId]) -> StoreResult<Vec<SuggestionRecord>> {
        self.inner.get_any(ids).await
    }

    async fn add_suggestion(&self, channel_id: ChannelId, suggested_by: UserId) -> StoreResult<()> {
        let _guard = self.suggestions_lock.lock().await;

        let suggestion = SuggestionRecord {
            channel_id,
            suggested_by,
            suggested_at: Some(Utc::now()),
        };
        let mut snapshot = self.inner.suggestions().await;
        snapshot.push(suggestion.clone());

        self.persist_suggestions(&snapshot).await?;
        self.inner.insert_suggestion(suggestion).await;
        Ok(())
    }

    async fn get_suggestions_by(&self, user: &UserId) -> StoreResult<Vec<SuggestionRecord>> {
        self.inner.get_suggestions_by(user).await
    }
}

#[async_trait]
impl PredictionStore for FileStore {
    async fn get_prediction(&self, id: &ChannelId) -> StoreResult<Option<PublishPredictionRecord>> {
        self.inner.get_prediction(id).await
    }

    async fn get_all_predictions(&self) -> StoreResult<Vec<PublishPredictionRecord>> {
        self.inner.get_all_predictions().await
    }
}
