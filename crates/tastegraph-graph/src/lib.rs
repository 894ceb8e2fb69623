//! Song similarity graph for tastegraph.
//!
//! Projects the song graph state onto a petgraph graph for read-side
//! queries: ranked neighbours of a track and clusters of tracks linked by
//! one kind of similarity edge.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

mod error;
mod similarity_graph;

pub use error::GraphError;
pub use similarity_graph::{Neighbour, SimilarityGraph};
