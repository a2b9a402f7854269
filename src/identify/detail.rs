/// Channel detail resolution, local catalog first, YouTube for the misses
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::guitar::is_guitar_channel;
use crate::models::{ChannelDetail, ChannelId, ClassificationTerm, ResolvedChannel};
use crate::store::{ChannelCatalog, TermRepository};
use crate::youtube::ChannelProvider;
use crate::Result;

/// Resolves channel ids to classified channel details.
///
/// Ids found in the local catalog never reach the remote provider; the
/// remaining ids go out in a single batch call.
#[derive(Clone)]
pub struct ChannelDetailResolver {
    catalog: Arc<dyn ChannelCatalog>,
    terms: Arc<dyn TermRepository>,
    provider: Arc<dyn ChannelProvider>,
}

impl ChannelDetailResolver {
    pub fn new(
        catalog: Arc<dyn ChannelCatalog>,
        terms: Arc<dyn TermRepository>,
        provider: Arc<dyn ChannelProvider>,
    ) -> Self {
        Self {
            catalog,
            terms,
            provider,
        }
    }

    /// Resolve a batch of ids.
    ///
    /// Duplicate ids collapse to one result. Local hits come first, then
    /// remote ones; ids unknown to both sources are absent.
    pub async fn resolve(&self, ids: &[ChannelId]) -> Result<Vec<ResolvedChannel>> {
        let mut seen = HashSet::new();
        let unique: Vec<ChannelId> = ids.iter().filter(|id| seen.insert(*id)).cloned().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let (terms, local) = futures::try_join!(
            self.terms.get_all_terms(),
            self.catalog.get_channels(&unique)
        )?;
        let found: HashSet<&ChannelId> = local.iter().map(|channel| &channel.id).collect();
        let misses: Vec<ChannelId> = unique
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect();

        debug!(
            "Resolved {} of {} channels locally, {} to fetch",
            local.len(),
            unique.len(),
            misses.len()
        );

        let remote = if misses.is_empty() {
            Vec::new()
        } else {
            self.provider.get_channel_details(&misses).await?
        };

        info!(
            "🔎 Channel details: {} local, {} remote, {} unknown",
            local.len(),
            remote.len(),
            misses.len().saturating_sub(remote.len())
        );

        let resolved = local
            .into_iter()
            .map(ChannelDetail::Local)
            .chain(remote.into_iter().map(ChannelDetail::Remote))
            .map(|detail| classify(&terms, detail))
            .collect();

        Ok(resolved)
    }

    /// Resolve exactly one id
    pub async fn resolve_one(&self, id: &ChannelId) -> Result<Option<ResolvedChannel>> {
        let resolved = self.resolve(std::slice::from_ref(id)).await?;
        Ok(resolved
            .into_iter()
            .find(|channel| channel.channel_id() == id))
    }
}

fn classify(terms: &[ClassificationTerm], detail: ChannelDetail) -> ResolvedChannel {
    let is_guitar_channel = is_guitar_channel(terms, detail.record());
    ResolvedChannel {
        detail,
        is_guitar_channel,
    }
}
