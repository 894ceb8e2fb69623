use serde::{Deserialize, Serialize};

use crate::model::features::FeatureType;
use crate::model::ids::{EdgeId, TrackId};

/// A weighted connection between two song nodes.
///
/// Endpoints are stored in canonical (lexicographic) order so that an edge
/// is identical regardless of which node was added first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongEdge {
    pub id: EdgeId,
    pub source: TrackId,
    pub target: TrackId,
    pub similarity_score: f64,
    pub feature_type: FeatureType,
}

impl SongEdge {
    #[must_use]
    pub fn new(a: &TrackId, b: &TrackId, feature_type: FeatureType, similarity_score: f64) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            id: EdgeId::new(a, b, feature_type),
            source: source.clone(),
            target: target.clone(),
            similarity_score,
            feature_type,
        }
    }

    /// Whether this edge touches the given node.
    #[must_use]
    pub fn touches(&self, node: &TrackId) -> bool {
        &self.source == node || &self.target == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_endpoints() {
        let edge = SongEdge::new(&"zeta".into(), &"alpha".into(), FeatureType::Energy, 0.9);
        assert_eq!(edge.source.as_str(), "alpha");
        assert_eq!(edge.target.as_str(), "zeta");
        assert_eq!(edge.id.to_string(), "alpha-zeta-energy");
    }

    #[test]
    fn test_touches() {
        let edge = SongEdge::new(&"a".into(), &"b".into(), FeatureType::Overall, 0.5);
        assert!(edge.touches(&"b".into()));
        assert!(edge.touches(&"a".into()));
        assert!(!edge.touches(&"c".into()));
    }
}
