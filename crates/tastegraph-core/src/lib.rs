//! Core domain model for tastegraph.
//!
//! This crate defines the track and feature-vector model, the similarity
//! engine that turns pairs of feature vectors into weighted edges, the
//! reducer-style graph and canvas state, layout geometry, and the SQLite
//! key/value store the state is mirrored to.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod layout;
pub mod model;
pub mod schema;
pub mod similarity;
pub mod state;

pub use error::{Error, Result};
pub use similarity::{build_edges, compare_features, Comparison, Thresholds};
pub use state::{CanvasAction, CanvasState, GraphAction, GraphState};
