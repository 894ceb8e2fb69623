//! Seams between the graph workflow and the outside catalog.

use async_trait::async_trait;
use tastegraph_core::model::{FeatureVector, TrackId, TrackSummary};

use crate::error::CatalogResult;

/// Track search and lookup.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Tracks matching a free-text query, best match first, at most `limit`.
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<TrackSummary>>;

    /// A single track by id.
    async fn track(&self, id: &TrackId) -> CatalogResult<TrackSummary>;

    /// Tracks recommended from up to five seed tracks.
    async fn recommendations(
        &self,
        seeds: &[TrackId],
        limit: u32,
    ) -> CatalogResult<Vec<TrackSummary>>;
}

/// Audio feature lookup.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Features of one track; `None` when the catalog has none for it.
    async fn features(&self, id: &TrackId) -> CatalogResult<Option<FeatureVector>>;

    /// Features of several tracks. The result has one entry per requested
    /// id, in the same order.
    async fn features_batch(&self, ids: &[TrackId]) -> CatalogResult<Vec<Option<FeatureVector>>>;
}
