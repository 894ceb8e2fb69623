use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::model::features::FeatureType;

/// Unique identifier for a free-form canvas node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasNodeId(Uuid);

impl CanvasNodeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CanvasNodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog identifier of a track (a Spotify track id).
///
/// Song nodes reuse the track id as their node id, which is what makes
/// re-adding a track detectable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Deterministic identifier of a graph edge.
///
/// Made of both endpoint ids and the feature label. The endpoints are put
/// in lexicographic order first, so the same pair yields the same id
/// whichever node was added first. The parts are kept separate: track ids
/// may themselves contain the `-` used in the display form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    low: TrackId,
    high: TrackId,
    feature: FeatureType,
}

impl EdgeId {
    #[must_use]
    pub fn new(a: &TrackId, b: &TrackId, feature: FeatureType) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.clone(),
            high: high.clone(),
            feature,
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.low, self.high, self.feature)
    }
}
