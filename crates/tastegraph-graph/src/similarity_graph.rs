use std::cmp::Ordering;
use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use tastegraph_core::model::{FeatureType, SongEdge, TrackId};
use tastegraph_core::state::{EdgeFilter, GraphState};

use crate::error::GraphError;

/// A track adjacent to another, and the edge connecting them.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour {
    pub track: TrackId,
    pub feature_type: FeatureType,
    pub similarity_score: f64,
}

/// Undirected view of a [`GraphState`] restricted to one edge filter.
///
/// Every node of the state is present; only edges matching the filter are.
/// A pair may be joined by several edges when the filter is
/// [`EdgeFilter::All`].
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    graph: UnGraph<TrackId, SongEdge>,
    index: HashMap<TrackId, NodeIndex>,
}

impl SimilarityGraph {
    #[must_use]
    pub fn from_state(state: &GraphState, filter: EdgeFilter) -> Self {
        let mut graph = UnGraph::with_capacity(state.node_count(), state.edge_count());
        let mut index = HashMap::with_capacity(state.node_count());

        for node in state.nodes() {
            let ix = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), ix);
        }

        for edge in state.filtered_edges(filter) {
            // Stored edges can outlive their nodes only through hand-edited state.
            let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) else {
                continue;
            };
            graph.add_edge(a, b, edge.clone());
        }

        Self { graph, index }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn lookup(&self, track: &TrackId) -> Result<NodeIndex, GraphError> {
        self.index
            .get(track)
            .copied()
            .ok_or_else(|| GraphError::UnknownTrack(track.clone()))
    }

    /// Adjacent tracks, strongest edge first. Ties are broken by track id.
    pub fn neighbours(&self, track: &TrackId) -> Result<Vec<Neighbour>, GraphError> {
        let ix = self.lookup(track)?;
        let mut neighbours: Vec<Neighbour> = self
            .graph
            .edges(ix)
            .map(|edge| {
                let other = if edge.source() == ix {
                    edge.target()
                } else {
                    edge.source()
                };
                Neighbour {
                    track: self.graph[other].clone(),
                    feature_type: edge.weight().feature_type,
                    similarity_score: edge.weight().similarity_score,
                }
            })
            .collect();

        neighbours.sort_by(|a, b| {
            b.similarity_score
                .total_cmp(&a.similarity_score)
                .then_with(|| a.track.cmp(&b.track))
                .then_with(|| a.feature_type.cmp(&b.feature_type))
        });
        Ok(neighbours)
    }

    /// Groups of tracks connected through the edges in this view.
    ///
    /// Tracks with no edges form singleton groups. Members are sorted by id;
    /// groups are ordered largest first, then by their first member.
    #[must_use]
    pub fn clusters(&self) -> Vec<Vec<TrackId>> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut groups: HashMap<usize, Vec<TrackId>> = HashMap::new();
        for ix in self.graph.node_indices() {
            groups
                .entry(sets.find(ix.index()))
                .or_default()
                .push(self.graph[ix].clone());
        }

        let mut clusters: Vec<Vec<TrackId>> = groups
            .into_values()
            .map(|mut members| {
                members.sort();
                members
            })
            .collect();
        clusters.sort_by(|a, b| match b.len().cmp(&a.len()) {
            Ordering::Equal => a.first().cmp(&b.first()),
            other => other,
        });
        clusters
    }
}
