//! Music catalog access for tastegraph.
//!
//! Wraps the Spotify Web API behind the [`TrackCatalog`] and
//! [`FeatureSource`] traits, loads configuration, and drives the add-track
//! flow through [`Session`]: fetch features, connect the new node to the
//! graph, mirror the result to the store.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod resilience;
pub mod session;
pub mod source;
pub mod spotify;

pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use session::{AddOutcome, Session};
pub use source::{FeatureSource, TrackCatalog};
pub use spotify::SpotifyClient;
