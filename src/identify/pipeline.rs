/// Channel identification from a free-text URL hint
use std::sync::Arc;
use tracing::{debug, info};

use super::ChannelDetailResolver;
use crate::models::{ChannelDetail, ChannelId, ChannelIdentification, IdentificationStatus};
use crate::store::SuggestionStore;
use crate::youtube::ChannelIdExtractor;
use crate::Result;

/// True when any of `ids` has already been suggested
pub async fn has_existing_suggestion(
    suggestions: &dyn SuggestionStore,
    ids: &[ChannelId],
) -> Result<bool> {
    Ok(!suggestions.get_any(ids).await?.is_empty())
}

/// Decides whether a hinted channel is unknown, listed, already suggested
/// or new to the catalog.
///
/// Every call runs the same decision tree and holds no state between calls:
///
/// 1. blank hint, no extractable id or no channel details: `NotValid`
/// 2. channel found in the local catalog: `AlreadyListed`
/// 3. channel only known remotely and suggested before: `AlreadySuggested`
/// 4. otherwise: `Novel`
///
/// Only store and provider failures are errors.
#[derive(Clone)]
pub struct ChannelIdentifier {
    extractor: Arc<dyn ChannelIdExtractor>,
    resolver: ChannelDetailResolver,
    suggestions: Arc<dyn SuggestionStore>,
}

impl ChannelIdentifier {
    pub fn new(
        extractor: Arc<dyn ChannelIdExtractor>,
        resolver: ChannelDetailResolver,
        suggestions: Arc<dyn SuggestionStore>,
    ) -> Self {
        Self {
            extractor,
            resolver,
            suggestions,
        }
    }

    pub async fn identify(&self, url_hint: &str) -> Result<ChannelIdentification> {
        if url_hint.trim().is_empty() {
            debug!("Blank channel hint");
            return Ok(ChannelIdentification::not_valid());
        }

        let channel_id = match self.extractor.extract_channel_id(url_hint).await? {
            Some(id) => id,
            None => {
                info!("❓ No channel id in hint: {}", url_hint);
                return Ok(ChannelIdentification::not_valid());
            }
        };

        let resolved = match self.resolver.resolve_one(&channel_id).await? {
            Some(resolved) => resolved,
            None => {
                info!("❓ Channel {} not found locally or on YouTube", channel_id);
                return Ok(ChannelIdentification::not_valid());
            }
        };

        let status = match &resolved.detail {
            ChannelDetail::Local(_) => IdentificationStatus::AlreadyListed,
            ChannelDetail::Remote(_) => {
                if has_existing_suggestion(
                    self.suggestions.as_ref(),
                    std::slice::from_ref(&channel_id),
                )
                .await?
                {
                    IdentificationStatus::AlreadySuggested
                } else {
                    IdentificationStatus::Novel
                }
            }
        };

        info!(
            "📺 Channel {} identified as {:?} (guitar channel: {})",
            channel_id, status, resolved.is_guitar_channel
        );
        Ok(ChannelIdentification::with_channel(status, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelRecord, ChannelSource, ClassificationTerm, UserId};
    use crate::store::MemoryStore;
    use crate::youtube::{ChannelProvider, ProviderError, ProviderResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats the hint itself as the id, unless it starts with "bad"
    #[derive(Default)]
    struct EchoExtractor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChannelIdExtractor for EchoExtractor {
        async fn extract_channel_id(&self, hint: &str) -> ProviderResult<Option<ChannelId>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match hint.trim() {
                "offline" => Err(ProviderError::Decode("connection reset".to_string())),
                h if h.starts_with("bad") => Ok(None),
                h => Ok(Some(ChannelId::from(h))),
            }
        }
    }

    struct StaticProvider(Vec<ChannelRecord>);

    #[async_trait]
    impl ChannelProvider for StaticProvider {
        async fn get_channel_details(&self, ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>> {
            Ok(self
                .0
                .iter()
                .filter(|channel| ids.contains(&channel.id))
                .cloned()
                .collect())
        }
    }

    async fn setup() -> (ChannelIdentifier, MemoryStore, Arc<EchoExtractor>) {
        let store = MemoryStore::new();
        store.set_terms(vec![ClassificationTerm::new("guitar")]).await;
        store
            .insert_channel(ChannelRecord::new("UClocal", "Guitar Tone", ""))
            .await;
        store
            .add_suggestion(ChannelId::from("UCsuggested"), UserId::new("ana"))
            .await
            .unwrap();

        let provider = Arc::new(StaticProvider(vec![
            ChannelRecord::new("UCsuggested", "Shred Academy", "guitar speed drills"),
            ChannelRecord::new("UCnew", "Bass Lab", "slap bass"),
            // also present locally, local wins
            ChannelRecord::new("UClocal", "Guitar Tone (remote)", ""),
        ]));
        let resolver =
            ChannelDetailResolver::new(Arc::new(store.clone()), Arc::new(store.clone()), provider);
        let extractor = Arc::new(EchoExtractor::default());
        let identifier = ChannelIdentifier::new(extractor.clone(), resolver, Arc::new(store.clone()));

        (identifier, store, extractor)
    }

    #[tokio::test]
    async fn test_blank_hint_is_not_valid_without_extraction() {
        let (identifier, _, extractor) = setup().await;

        for hint in ["", "   ", "\t\n"] {
            let result = identifier.identify(hint).await.unwrap();
            assert_eq!(result.status, IdentificationStatus::NotValid);
            assert!(result.channel().is_none());
        }
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unextractable_hint_is_not_valid() {
        let (identifier, _, _) = setup().await;
        let result = identifier.identify("bad-url").await.unwrap();
        assert_eq!(result.status, IdentificationStatus::NotValid);
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_valid() {
        let (identifier, _, _) = setup().await;
        let result = identifier.identify("UCnowhere").await.unwrap();
        assert_eq!(result.status, IdentificationStatus::NotValid);
        assert!(result.channel().is_none());
    }

    #[tokio::test]
    async fn test_local_channel_is_already_listed() {
        let (identifier, store, _) = setup().await;
        // suggestion history does not matter for listed channels
        store
            .add_suggestion(ChannelId::from("UClocal"), UserId::new("bo"))
            .await
            .unwrap();

        let result = identifier.identify("UClocal").await.unwrap();
        assert_eq!(result.status, IdentificationStatus::AlreadyListed);
        assert_eq!(result.source(), Some(ChannelSource::Local));
        assert_eq!(result.channel().unwrap().title, "Guitar Tone");
        assert!(result.is_guitar_channel());
    }

    #[tokio::test]
    async fn test_remote_suggested_channel() {
        let (identifier, _, _) = setup().await;
        let result = identifier.identify("UCsuggested").await.unwrap();
        assert_eq!(result.status, IdentificationStatus::AlreadySuggested);
        assert_eq!(result.source(), Some(ChannelSource::Remote));
        assert!(result.is_guitar_channel());
    }

    #[tokio::test]
    async fn test_remote_unsuggested_channel_is_novel() {
        let (identifier, _, _) = setup().await;
        let result = identifier.identify("UCnew").await.unwrap();
        assert_eq!(result.status, IdentificationStatus::Novel);
        assert_eq!(result.channel_id(), Some(&ChannelId::from("UCnew")));
        assert!(!result.is_guitar_channel());
    }

    #[tokio::test]
    async fn test_faults_propagate() {
        let (identifier, store, _) = setup().await;
        assert!(matches!(
            identifier.identify("offline").await,
            Err(crate::CatalogError::Provider(_))
        ));

        store.set_healthy(false).await;
        assert!(matches!(
            identifier.identify("UCnew").await,
            Err(crate::CatalogError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_has_existing_suggestion() {
        let (_, store, _) = setup().await;
        assert!(has_existing_suggestion(&store, &[ChannelId::from("UCsuggested")])
            .await
            .unwrap());
        assert!(!has_existing_suggestion(&store, &[ChannelId::from("UCnew"), ChannelId::from("UClocal")])
            .await
            .unwrap());
    }
}
