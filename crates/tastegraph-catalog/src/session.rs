//! The add-track workflow.
//!
//! A [`Session`] owns the song graph for the lifetime of one process. Each
//! operation runs to completion: catalog lookups are awaited, the graph is
//! replaced with the reducer's next snapshot, and the snapshot is written to
//! the store. Upstream failures are logged and turned into empty results;
//! they never leave the graph half-updated.

use rand::rngs::StdRng;
use rand::SeedableRng;

use tastegraph_core::layout::Viewport;
use tastegraph_core::model::{FeatureVector, SongNode, TrackId, TrackSummary};
use tastegraph_core::schema::Store;
use tastegraph_core::{GraphAction, GraphState, Thresholds};

use crate::error::CatalogResult;
use crate::source::{FeatureSource, TrackCatalog};
use crate::spotify::MAX_SEED_TRACKS;

/// What happened to a track the user asked to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The node was added, together with this many new edges.
    Added { edges: usize },
    /// A node for the track already exists; nothing changed.
    AlreadyPresent,
    /// The feature lookup failed or came back empty; nothing changed.
    FeaturesUnavailable,
    /// The track itself could not be looked up; nothing changed.
    TrackUnavailable,
}

/// Song graph plus the collaborators needed to grow it.
#[derive(Debug)]
pub struct Session<C> {
    catalog: C,
    store: Store,
    graph: GraphState,
    thresholds: Thresholds,
    viewport: Viewport,
    rng: StdRng,
}

impl<C> Session<C>
where
    C: TrackCatalog + FeatureSource,
{
    /// Start a session, restoring the graph from the store.
    pub fn open(catalog: C, store: Store, viewport: Viewport) -> CatalogResult<Self> {
        let graph = store.load_graph()?;
        log::info!(
            "Restored song graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Self {
            catalog,
            store,
            graph,
            thresholds: Thresholds::DEFAULT,
            viewport,
            rng: StdRng::from_entropy(),
        })
    }

    /// Use a fixed seed for node placement.
    #[cfg(test)]
    fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub const fn graph(&self) -> &GraphState {
        &self.graph
    }

    /// Search the catalog. An empty query or a failed request gives no results.
    pub async fn search(&self, query: &str, limit: u32) -> Vec<TrackSummary> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        match self.catalog.search_tracks(query, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Add a track found through search.
    pub async fn add_track(&mut self, track: &TrackSummary) -> CatalogResult<AddOutcome> {
        if self.graph.contains(&track.id) {
            log::info!("{} is already in the graph", track.id);
            return Ok(AddOutcome::AlreadyPresent);
        }

        let features = match self.catalog.features(&track.id).await {
            Ok(Some(features)) => features,
            Ok(None) => {
                log::warn!("No audio features for {}", track.id);
                return Ok(AddOutcome::FeaturesUnavailable);
            }
            Err(e) => {
                log::warn!("Failed to get audio features for {}: {}", track.id, e);
                return Ok(AddOutcome::FeaturesUnavailable);
            }
        };

        self.insert(track, features)
    }

    /// Add a track by catalog id.
    pub async fn add_track_by_id(&mut self, id: &TrackId) -> CatalogResult<AddOutcome> {
        if self.graph.contains(id) {
            log::info!("{} is already in the graph", id);
            return Ok(AddOutcome::AlreadyPresent);
        }

        match self.catalog.track(id).await {
            Ok(track) => self.add_track(&track).await,
            Err(e) => {
                log::warn!("Failed to look up track {}: {}", id, e);
                Ok(AddOutcome::TrackUnavailable)
            }
        }
    }

    /// Add several tracks with a single batch feature lookup.
    ///
    /// Outcomes are returned in input order. A track listed twice is added
    /// once; the second occurrence reports [`AddOutcome::AlreadyPresent`].
    pub async fn add_tracks(&mut self, tracks: &[TrackSummary]) -> CatalogResult<Vec<AddOutcome>> {
        let pending: Vec<TrackId> = tracks
            .iter()
            .filter(|t| !self.graph.contains(&t.id))
            .map(|t| t.id.clone())
            .collect();

        let features = match self.catalog.features_batch(&pending).await {
            Ok(features) => features,
            Err(e) => {
                log::warn!("Failed to get audio features for {} tracks: {}", pending.len(), e);
                vec![None; pending.len()]
            }
        };

        let mut outcomes = Vec::with_capacity(tracks.len());
        for track in tracks {
            if self.graph.contains(&track.id) {
                outcomes.push(AddOutcome::AlreadyPresent);
                continue;
            }
            let found = pending
                .iter()
                .position(|id| id == &track.id)
                .and_then(|ix| features.get(ix).copied().flatten());
            match found {
                Some(f) => outcomes.push(self.insert(track, f)?),
                None => {
                    log::warn!("No audio features for {}", track.id);
                    outcomes.push(AddOutcome::FeaturesUnavailable);
                }
            }
        }
        Ok(outcomes)
    }

    /// Tracks recommended from the first nodes of the graph.
    pub async fn recommend(&self, limit: u32) -> Vec<TrackSummary> {
        let seeds: Vec<TrackId> = self
            .graph
            .nodes()
            .iter()
            .take(MAX_SEED_TRACKS)
            .map(|n| n.id.clone())
            .collect();
        if seeds.is_empty() {
            return Vec::new();
        }
        match self.catalog.recommendations(&seeds, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Failed to get recommendations: {}", e);
                Vec::new()
            }
        }
    }

    fn insert(&mut self, track: &TrackSummary, features: FeatureVector) -> CatalogResult<AddOutcome> {
        let position = self.viewport.random_position(&mut self.rng);
        let node = SongNode::from_track(track, features, position);
        let before = self.graph.edge_count();
        self.dispatch(GraphAction::AddNode(node))?;
        let edges = self.graph.edge_count() - before;
        log::info!("Added {} with {} edges", track.id, edges);
        Ok(AddOutcome::Added { edges })
    }

    fn dispatch(&mut self, action: GraphAction) -> CatalogResult<()> {
        let next = self.graph.apply(action, &self.thresholds);
        self.store.save_graph(&next)?;
        self.graph = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeCatalog {
        tracks: HashMap<TrackId, TrackSummary>,
        features: HashMap<TrackId, FeatureVector>,
        offline: bool,
        feature_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn with_track(mut self, id: &str, danceability: f64) -> Self {
            let track = TrackSummary::new(id, format!("Song {}", id)).with_artist("Band");
            self.features.insert(
                track.id.clone(),
                FeatureVector {
                    danceability,
                    energy: 0.5,
                    valence: 0.5,
                    tempo: 120.0,
                    acousticness: 0.5,
                    instrumentalness: 0.0,
                },
            );
            self.tracks.insert(track.id.clone(), track);
            self
        }

        fn offline_error() -> CatalogError {
            CatalogError::Http {
                source_name: "fake".to_string(),
                message: "offline".to_string(),
            }
        }
    }

    #[async_trait]
    impl TrackCatalog for FakeCatalog {
        async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<TrackSummary>> {
            if self.offline {
                return Err(Self::offline_error());
            }
            let mut found: Vec<TrackSummary> = self
                .tracks
                .values()
                .filter(|t| t.name.contains(query))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.id.cmp(&b.id));
            found.truncate(limit as usize);
            Ok(found)
        }

        async fn track(&self, id: &TrackId) -> CatalogResult<TrackSummary> {
            self.tracks.get(id).cloned().ok_or_else(|| CatalogError::NotFound {
                entity: id.to_string(),
                source_name: "fake".to_string(),
            })
        }

        async fn recommendations(
            &self,
            seeds: &[TrackId],
            limit: u32,
        ) -> CatalogResult<Vec<TrackSummary>> {
            assert!(seeds.len() <= MAX_SEED_TRACKS);
            Ok(self
                .tracks
                .values()
                .filter(|t| !seeds.contains(&t.id))
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl FeatureSource for FakeCatalog {
        async fn features(&self, id: &TrackId) -> CatalogResult<Option<FeatureVector>> {
            self.feature_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(Self::offline_error());
            }
            Ok(self.features.get(id).copied())
        }

        async fn features_batch(&self, ids: &[TrackId]) -> CatalogResult<Vec<Option<FeatureVector>>> {
            self.feature_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(Self::offline_error());
            }
            Ok(ids.iter().map(|id| self.features.get(id).copied()).collect())
        }
    }

    fn session(catalog: FakeCatalog) -> Session<FakeCatalog> {
        let store = Store::open_in_memory().unwrap();
        Session::open(catalog, store, Viewport::default())
            .unwrap()
            .with_seed(1)
    }

    #[tokio::test]
    async fn test_search_filters_and_limits() {
        let s = session(FakeCatalog::default().with_track("a", 0.1).with_track("b", 0.2));
        assert_eq!(s.search("Song", 1).await.len(), 1);
        assert_eq!(s.search("Song", 10).await.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_search_is_empty() {
        let s = session(FakeCatalog::default().with_track("a", 0.1));
        assert!(s.search("   ", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_is_empty() {
        let catalog = FakeCatalog {
            offline: true,
            ..FakeCatalog::default()
        };
        assert!(session(catalog).search("anything", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_track_builds_edges() {
        let catalog = FakeCatalog::default().with_track("a", 0.5).with_track("b", 0.55);
        let a = catalog.tracks[&TrackId::new("a")].clone();
        let b = catalog.tracks[&TrackId::new("b")].clone();
        let mut s = session(catalog);

        assert_eq!(s.add_track(&a).await.unwrap(), AddOutcome::Added { edges: 0 });
        assert_eq!(s.add_track(&b).await.unwrap(), AddOutcome::Added { edges: 6 });
        assert_eq!(s.graph().node_count(), 2);
    }

    #[tokio::test]
    async fn test_re_add_skips_feature_lookup() {
        let catalog = FakeCatalog::default().with_track("a", 0.5);
        let a = catalog.tracks[&TrackId::new("a")].clone();
        let mut s = session(catalog);

        s.add_track(&a).await.unwrap();
        assert_eq!(s.add_track(&a).await.unwrap(), AddOutcome::AlreadyPresent);
        assert_eq!(s.catalog.feature_calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.graph().node_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_features_drop_the_add() {
        let mut s = session(FakeCatalog::default());
        let unknown = TrackSummary::new("zzz", "Nobody");
        assert_eq!(
            s.add_track(&unknown).await.unwrap(),
            AddOutcome::FeaturesUnavailable
        );
        assert!(s.graph().is_empty());
    }

    #[tokio::test]
    async fn test_offline_feature_lookup_drops_the_add() {
        let catalog = FakeCatalog {
            offline: true,
            ..FakeCatalog::default()
        };
        let mut s = session(catalog);
        let track = TrackSummary::new("a", "Song a");
        assert_eq!(
            s.add_track(&track).await.unwrap(),
            AddOutcome::FeaturesUnavailable
        );
        assert!(s.graph().is_empty());
    }

    #[tokio::test]
    async fn test_add_by_id() {
        let mut s = session(FakeCatalog::default().with_track("a", 0.5));
        assert_eq!(
            s.add_track_by_id(&"a".into()).await.unwrap(),
            AddOutcome::Added { edges: 0 }
        );
        assert_eq!(
            s.add_track_by_id(&"missing".into()).await.unwrap(),
            AddOutcome::TrackUnavailable
        );
    }

    #[tokio::test]
    async fn test_add_tracks_in_batch() {
        let catalog = FakeCatalog::default()
            .with_track("a", 0.1)
            .with_track("b", 0.9)
            .with_track("c", 0.15);
        let a = catalog.tracks[&TrackId::new("a")].clone();
        let b = catalog.tracks[&TrackId::new("b")].clone();
        let c = catalog.tracks[&TrackId::new("c")].clone();
        let ghost = TrackSummary::new("ghost", "Ghost");
        let mut s = session(catalog);

        let outcomes = s
            .add_tracks(&[a.clone(), ghost, b, a, c])
            .await
            .unwrap();

        assert_eq!(outcomes[0], AddOutcome::Added { edges: 0 });
        assert_eq!(outcomes[1], AddOutcome::FeaturesUnavailable);
        assert!(matches!(outcomes[2], AddOutcome::Added { .. }));
        assert_eq!(outcomes[3], AddOutcome::AlreadyPresent);
        assert!(matches!(outcomes[4], AddOutcome::Added { .. }));
        assert_eq!(s.graph().node_count(), 3);
        assert_eq!(s.catalog.feature_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_positions_are_inside_viewport_bands() {
        let catalog = FakeCatalog::default().with_track("a", 0.5);
        let a = catalog.tracks[&TrackId::new("a")].clone();
        let mut s = session(catalog);
        s.add_track(&a).await.unwrap();

        let node = &s.graph().nodes()[0];
        let (x_min, x_max) = Viewport::default().x_band();
        let (y_min, y_max) = Viewport::default().y_band();
        assert!((x_min..=x_max).contains(&node.position.x));
        assert!((y_min..=y_max).contains(&node.position.y));
    }

    #[tokio::test]
    async fn test_recommend_uses_at_most_five_seeds() {
        let mut catalog = FakeCatalog::default();
        for i in 0..8 {
            catalog = catalog.with_track(&format!("t{}", i), 0.5);
        }
        let tracks: Vec<TrackSummary> = catalog.tracks.values().cloned().collect();
        let mut s = session(catalog);
        assert!(s.recommend(5).await.is_empty());

        s.add_tracks(&tracks[..7]).await.unwrap();
        let recommended = s.recommend(5).await;
        assert!(!recommended.is_empty());
    }
}
