//! Similarity engine.
//!
//! Compares two feature vectors attribute by attribute and turns the
//! comparison into graph edges: one `overall` edge weighted by the aggregate
//! score, plus one edge per attribute whose difference is within that
//! attribute's threshold.

use crate::model::{FeatureType, FeatureVector, SongEdge, SongNode};

/// Tempo (BPM) that maps to a normalized value of 1.0.
pub const TEMPO_RANGE: f64 = 250.0;

/// Slack allowed when testing a difference against its threshold.
///
/// Differences are computed in binary floating point, so a pair that is
/// exactly on the threshold in decimal (0.80 vs 0.60) can land a few ulps
/// above it. Anything within this tolerance counts as on the threshold.
pub const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Maximum per-attribute difference for an attribute edge to be created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
}

impl Thresholds {
    pub const DEFAULT: Self = Self {
        danceability: 0.20,
        energy: 0.20,
        valence: 0.20,
        tempo: 0.15,
        acousticness: 0.20,
    };

    /// Threshold for an attribute. `Overall` has none; its edge is unconditional.
    #[must_use]
    pub const fn for_feature(&self, feature: FeatureType) -> Option<f64> {
        match feature {
            FeatureType::Danceability => Some(self.danceability),
            FeatureType::Energy => Some(self.energy),
            FeatureType::Valence => Some(self.valence),
            FeatureType::Tempo => Some(self.tempo),
            FeatureType::Acousticness => Some(self.acousticness),
            FeatureType::Overall => None,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of comparing two feature vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// `1 - (sum of differences) / 5`; 1.0 means identical.
    pub score: f64,
    pub danceability_diff: f64,
    pub energy_diff: f64,
    pub valence_diff: f64,
    /// Difference of the tempos after normalization by [`TEMPO_RANGE`].
    pub tempo_diff: f64,
    pub acousticness_diff: f64,
}

impl Comparison {
    #[must_use]
    pub const fn diff(&self, feature: FeatureType) -> Option<f64> {
        match feature {
            FeatureType::Danceability => Some(self.danceability_diff),
            FeatureType::Energy => Some(self.energy_diff),
            FeatureType::Valence => Some(self.valence_diff),
            FeatureType::Tempo => Some(self.tempo_diff),
            FeatureType::Acousticness => Some(self.acousticness_diff),
            FeatureType::Overall => None,
        }
    }

    #[must_use]
    pub fn total_diff(&self) -> f64 {
        self.danceability_diff
            + self.energy_diff
            + self.valence_diff
            + self.tempo_diff
            + self.acousticness_diff
    }
}

/// Normalized value of a comparable attribute.
///
/// Tempo is divided by [`TEMPO_RANGE`] and capped to `[0, 1]` so that one
/// full tempo range weighs the same as a fully opposed unit attribute.
fn normalized(features: &FeatureVector, feature: FeatureType) -> f64 {
    match feature {
        FeatureType::Tempo => (features.tempo / TEMPO_RANGE).clamp(0.0, 1.0),
        other => features.value(other).unwrap_or_default(),
    }
}

fn diff(a: &FeatureVector, b: &FeatureVector, feature: FeatureType) -> f64 {
    (normalized(a, feature) - normalized(b, feature)).abs()
}

/// Compare two feature vectors.
///
/// Pure and symmetric. `instrumentalness` is not part of the comparison.
#[must_use]
pub fn compare_features(a: &FeatureVector, b: &FeatureVector) -> Comparison {
    let mut comparison = Comparison {
        score: 0.0,
        danceability_diff: diff(a, b, FeatureType::Danceability),
        energy_diff: diff(a, b, FeatureType::Energy),
        valence_diff: diff(a, b, FeatureType::Valence),
        tempo_diff: diff(a, b, FeatureType::Tempo),
        acousticness_diff: diff(a, b, FeatureType::Acousticness),
    };
    let attribute_count = FeatureType::ATTRIBUTES.len() as f64;
    comparison.score = 1.0 - comparison.total_diff() / attribute_count;
    comparison
}

/// Inclusive threshold test.
#[must_use]
pub fn within_threshold(diff: f64, threshold: f64) -> bool {
    diff <= threshold + THRESHOLD_TOLERANCE
}

/// Edges between an existing node and a newly added one.
///
/// Returns nothing unless both nodes carry features. Otherwise returns the
/// `overall` edge followed by the qualifying attribute edges in attribute
/// order, each weighted `1 - diff`.
#[must_use]
pub fn build_edges(existing: &SongNode, new: &SongNode, thresholds: &Thresholds) -> Vec<SongEdge> {
    let (Some(a), Some(b)) = (&existing.features, &new.features) else {
        return Vec::new();
    };

    let comparison = compare_features(a, b);
    let mut edges = Vec::with_capacity(FeatureType::ALL.len());
    edges.push(SongEdge::new(
        &existing.id,
        &new.id,
        FeatureType::Overall,
        comparison.score,
    ));

    for feature in FeatureType::ATTRIBUTES {
        let (Some(d), Some(threshold)) = (comparison.diff(feature), thresholds.for_feature(feature))
        else {
            continue;
        };
        if within_threshold(d, threshold) {
            edges.push(SongEdge::new(&existing.id, &new.id, feature, 1.0 - d));
        }
    }

    edges
}
