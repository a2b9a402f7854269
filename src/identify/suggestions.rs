/// User suggestions of channels for the catalog
use std::sync::Arc;
use tracing::info;

use super::ChannelDetailResolver;
use crate::models::{ChannelId, ResolvedChannel, SuggestionRecord, UserId};
use crate::store::SuggestionStore;
use crate::Result;

/// Records channel suggestions and resolves suggested channels for review.
///
/// The caller supplies the authenticated user; operations that need one
/// return `None` when the user is missing.
#[derive(Clone)]
pub struct SuggestionService {
    store: Arc<dyn SuggestionStore>,
    resolver: ChannelDetailResolver,
}

impl SuggestionService {
    pub fn new(store: Arc<dyn SuggestionStore>, resolver: ChannelDetailResolver) -> Self {
        Self { store, resolver }
    }

    /// Record that `user` proposes `channel_id`. Store failures are returned.
    pub async fn suggest_channel(&self, channel_id: ChannelId, user: &UserId) -> Result<()> {
        self.store.add_suggestion(channel_id.clone(), user.clone()).await?;
        info!("💡 {} suggested channel {}", user, channel_id);
        Ok(())
    }

    /// Resolve and classify a batch of channel ids for an authenticated user
    pub async fn channel_suggestions(
        &self,
        ids: &[ChannelId],
        user: Option<&UserId>,
    ) -> Result<Option<Vec<ResolvedChannel>>> {
        let Some(user) = user else {
            return Ok(None);
        };

        let resolved = self.resolver.resolve(ids).await?;
        info!(
            "💡 Resolved {} of {} suggested channels for {}",
            resolved.len(),
            ids.len(),
            user
        );
        Ok(Some(resolved))
    }

    /// Suggestions previously made by `user`
    pub async fn suggestions_by(&self, user: &UserId) -> Result<Vec<SuggestionRecord>> {
        Ok(self.store.get_suggestions_by(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelRecord, ClassificationTerm};
    use crate::store::MemoryStore;
    use crate::youtube::{ChannelProvider, ProviderResult};
    use async_trait::async_trait;

    struct NoRemote;

    #[async_trait]
    impl ChannelProvider for NoRemote {
        async fn get_channel_details(&self, _ids: &[ChannelId]) -> ProviderResult<Vec<ChannelRecord>> {
            Ok(Vec::new())
        }
    }

    async fn service() -> (SuggestionService, MemoryStore) {
        let store = MemoryStore::new();
        store.set_terms(vec![ClassificationTerm::new("fretboard")]).await;
        store
            .insert_channel(ChannelRecord::new("UC1", "Fretboard Maps", ""))
            .await;

        let resolver =
            ChannelDetailResolver::new(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(NoRemote));
        (SuggestionService::new(Arc::new(store.clone()), resolver), store)
    }

    #[tokio::test]
    async fn test_suggest_channel_records_user() {
        let (service, store) = service().await;
        service
            .suggest_channel(ChannelId::from("UC9"), &UserId::new("ana"))
            .await
            .unwrap();

        let suggestions = store.suggestions().await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggested_by, UserId::new("ana"));

        let mine = service.suggestions_by(&UserId::new("ana")).await.unwrap();
        assert_eq!(mine[0].channel_id, ChannelId::from("UC9"));
    }

    #[tokio::test]
    async fn test_suggest_channel_surfaces_store_failure() {
        let (service, store) = service().await;
        store.set_healthy(false).await;

        assert!(service
            .suggest_channel(ChannelId::from("UC9"), &UserId::new("ana"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_channel_suggestions_require_user() {
        let (service, _) = service().await;
        let ids = vec![ChannelId::from("UC1"), ChannelId::from("UC2")];

        assert!(service.channel_suggestions(&ids, None).await.unwrap().is_none());

        let resolved = service
            .channel_suggestions(&ids, Some(&UserId::new("ana")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].is_guitar_channel);
    }
}
