use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::features::FeatureVector;
use crate::model::ids::TrackId;
use crate::model::track::TrackSummary;

/// Fill colour of a song node.
pub const SONG_NODE_COLOR: &str = "#FFFFFF";

/// Diameter of a song node, in canvas pixels.
pub const SONG_NODE_SIZE: u32 = 60;

/// A point on the canvas, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A track placed on the song graph.
///
/// The node id is the track id. Position is assigned once when the node is
/// created and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongNode {
    pub id: TrackId,
    pub track_name: String,
    pub artist_name: String,
    pub album_image_url: Option<String>,

    #[serde(flatten)]
    pub position: Position,

    pub color: String,
    pub size: u32,

    /// Absent only for nodes restored from state written without features.
    pub features: Option<FeatureVector>,

    pub added_at: DateTime<Utc>,
}

impl SongNode {
    /// Build a node for a catalog track.
    #[must_use]
    pub fn from_track(track: &TrackSummary, features: FeatureVector, position: Position) -> Self {
        Self {
            id: track.id.clone(),
            track_name: track.name.clone(),
            artist_name: track.artist_line(),
            album_image_url: track.cover_url().map(str::to_string),
            position,
            color: SONG_NODE_COLOR.to_string(),
            size: SONG_NODE_SIZE,
            features: Some(features),
            added_at: Utc::now(),
        }
    }

    /// `"<track> - <artists>"`, the caption shown for a selected node.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} - {}", self.track_name, self.artist_name)
    }
}
