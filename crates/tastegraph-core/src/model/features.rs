use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The label carried by a graph edge.
///
/// Five variants name the comparable audio attributes; `Overall` marks the
/// aggregate edge that every feature-bearing pair receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Danceability,
    Energy,
    Valence,
    Tempo,
    Acousticness,
    Overall,
}

impl FeatureType {
    /// The attributes that take part in comparison, in comparison order.
    pub const ATTRIBUTES: [Self; 5] = [
        Self::Danceability,
        Self::Energy,
        Self::Valence,
        Self::Tempo,
        Self::Acousticness,
    ];

    /// Every edge label, attributes first.
    pub const ALL: [Self; 6] = [
        Self::Danceability,
        Self::Energy,
        Self::Valence,
        Self::Tempo,
        Self::Acousticness,
        Self::Overall,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danceability => "danceability",
            Self::Energy => "energy",
            Self::Valence => "valence",
            Self::Tempo => "tempo",
            Self::Acousticness => "acousticness",
            Self::Overall => "overall",
        }
    }

    /// Human-facing name, as shown in the connection-type picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Danceability => "Danceability",
            Self::Energy => "Energy",
            Self::Valence => "Mood (Valence)",
            Self::Tempo => "Tempo",
            Self::Acousticness => "Acousticness",
            Self::Overall => "Overall",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature type: {0} (expected one of danceability, energy, valence, tempo, acousticness, overall)")]
pub struct ParseFeatureTypeError(String);

impl FromStr for FeatureType {
    type Err = ParseFeatureTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str() == needle)
            .ok_or_else(|| ParseFeatureTypeError(s.to_string()))
    }
}

/// Audio-content attributes of a single track.
///
/// All fields except `tempo` lie in `[0, 1]`; tempo is in beats per minute
/// and conventionally falls between 0 and 250. `instrumentalness` is kept
/// with the vector but does not take part in comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
}

impl FeatureVector {
    /// Raw value of a comparable attribute. `Overall` has no value.
    #[must_use]
    pub const fn value(&self, feature: FeatureType) -> Option<f64> {
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
