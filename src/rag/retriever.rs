//! Tiered retrieval cascade: primary index, static catalog, restricted web search

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::errors::NyayaError;
use crate::errors::Result;
use crate::models::ContextChunk;
use crate::models::RetrievalResult;
use crate::models::RetrievalTier;
use crate::rag::catalog::StaticFallbackCatalog;
use crate::rag::index::PrimaryIndexClient;
use crate::rag::web::RestrictedWebFallback;

/// Runs the retrieval tiers in fixed order and stops at the first non-empty one
///
/// Holds only read-only handles, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct RetrievalOrchestrator {
    index: PrimaryIndexClient,
    catalog: StaticFallbackCatalog,
    restricted_web: RestrictedWebFallback,
}

impl RetrievalOrchestrator {
    #[must_use]
    pub const fn new(
        index: PrimaryIndexClient,
        catalog: StaticFallbackCatalog,
        restricted_web: RestrictedWebFallback,
    ) -> Self {
        Self {
            index,
            catalog,
            restricted_web,
        }
    }

    /// Retrieve evidence for `query`
    ///
    /// Never fails: every capability error degrades to "no result" and the
    /// cascade advances. An exhausted cascade returns [`RetrievalResult::empty`].
    pub async fn retrieve(&self, query: &str, top_k: usize) -> RetrievalResult {
        let chunks = self.index.search(query, top_k).await;
        if let Some(chunks) = non_empty(chunks, RetrievalTier::Primary) {
            return finish(&chunks, RetrievalTier::Primary);
        }

        if let Some(entry) = self.catalog.lookup(query) {
            info!("Static fallback matched topic '{}'", entry.topic);
            return finish(&[entry.to_chunk()], RetrievalTier::StaticFallback);
        }
        debug!("No static fallback topic matched");

        let chunks = self.restricted_web.search(query).await;
        if let Some(chunks) = non_empty(chunks, RetrievalTier::WebRestricted) {
            return finish(&chunks, RetrievalTier::WebRestricted);
        }

        info!("All retrieval tiers exhausted");
        RetrievalResult::empty()
    }
}

/// Log the outcome of a tier and keep its chunks only if there are any
fn non_empty(outcome: Result<Vec<ContextChunk>>, tier: RetrievalTier) -> Option<Vec<ContextChunk>> {
    match outcome {
        Ok(chunks) if chunks.is_empty() => {
            debug!("{} tier returned no results", tier);
            None
        }
        Ok(chunks) => Some(chunks),
        Err(NyayaError::CapabilityUnavailable(reason)) => {
            debug!("{} tier skipped: {}", tier, reason);
            None
        }
        Err(e) if e.is_recoverable_retrieval() => {
            warn!("{} tier failed, advancing cascade: {}", tier, e);
            None
        }
        Err(e) => {
            error!("{} tier raised an unexpected error, advancing cascade: {}", tier, e);
            None
        }
    }
}

fn finish(chunks: &[ContextChunk], tier: RetrievalTier) -> RetrievalResult {
    let result = RetrievalResult::from_chunks(chunks, tier);
    info!(
        "Retrieved {} chunk(s), {} source(s) at tier {}",
        chunks.len(),
        result.sources.len(),
        tier
    );
    result
}
