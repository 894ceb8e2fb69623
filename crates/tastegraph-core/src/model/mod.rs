pub mod canvas;
pub mod edge;
pub mod features;
pub mod ids;
pub mod node;
pub mod track;

pub use canvas::CanvasNode;
pub use edge::SongEdge;
pub use features::{FeatureType, FeatureVector, ParseFeatureTypeError};
pub use ids::{CanvasNodeId, EdgeId, TrackId};
pub use node::{Position, SongNode};
pub use track::{AlbumImage, TrackSummary};
