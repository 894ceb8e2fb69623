use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::{EdgeId, FeatureType, ParseFeatureTypeError, SongEdge, SongNode, TrackId};
use crate::similarity::{build_edges, Thresholds};

/// A state transition of the song graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// Add a node and connect it to every node already present.
    AddNode(SongNode),
    /// Drop every node and edge.
    Reset,
}

/// Which edges a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeFilter {
    /// Every edge, whatever its feature type.
    #[default]
    All,
    /// Only edges of one feature type.
    Only(FeatureType),
}

impl EdgeFilter {
    #[must_use]
    pub fn matches(self, edge: &SongEdge) -> bool {
        match self {
            Self::All => true,
            Self::Only(feature) => edge.feature_type == feature,
        }
    }
}

impl fmt::Display for EdgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(feature) => write!(f, "{}", feature),
        }
    }
}

impl FromStr for EdgeFilter {
    type Err = ParseFeatureTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Nodes and edges of the song graph.
///
/// Nodes keep insertion order. Edges are keyed by their deterministic id, so
/// recomputing an edge for a pair replaces it instead of duplicating it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    nodes: Vec<SongNode>,
    edges: BTreeMap<EdgeId, SongEdge>,
}

impl GraphState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from stored collections.
    ///
    /// Later nodes with an already seen id are dropped; later edges with an
    /// already seen id replace earlier ones.
    #[must_use]
    pub fn from_parts(nodes: Vec<SongNode>, edges: Vec<SongEdge>) -> Self {
        let mut state = Self::new();
        for node in nodes {
            if !state.contains(&node.id) {
                state.nodes.push(node);
            }
        }
        state.edges = edges.into_iter().map(|e| (e.id.clone(), e)).collect();
        state
    }

    /// Apply an action, producing the next state.
    #[must_use]
    pub fn apply(&self, action: GraphAction, thresholds: &Thresholds) -> Self {
        match action {
            GraphAction::AddNode(node) => self.with_node(node, thresholds),
            GraphAction::Reset => Self::new(),
        }
    }

    fn with_node(&self, node: SongNode, thresholds: &Thresholds) -> Self {
        if self.contains(&node.id) {
            log::debug!("Track {} is already in the graph", node.id);
            return self.clone();
        }

        let mut next = self.clone();
        for existing in &self.nodes {
            for edge in build_edges(existing, &node, thresholds) {
                next.edges.insert(edge.id.clone(), edge);
            }
        }
        next.nodes.push(node);
        next
    }

    #[must_use]
    pub fn contains(&self, id: &TrackId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    #[must_use]
    pub fn node(&self, id: &TrackId) -> Option<&SongNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[SongNode] {
        &self.nodes
    }

    /// Edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &SongEdge> {
        self.edges.values()
    }

    pub fn filtered_edges(&self, filter: EdgeFilter) -> impl Iterator<Item = &SongEdge> {
        self.edges.values().filter(move |e| filter.matches(e))
    }

    /// Edges touching a node.
    pub fn edges_of<'a>(&'a self, id: &'a TrackId) -> impl Iterator<Item = &'a SongEdge> {
        self.edges.values().filter(move |e| e.touches(id))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
