use tastegraph_core::model::TrackId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("track {0} is not in the graph")]
    UnknownTrack(TrackId),
}
