pub mod add;
pub mod canvas;
pub mod config;
pub mod graph;
pub mod search;

use anyhow::{Context, Result};
use tastegraph_catalog::{AddOutcome, Config, Session, SpotifyClient};
use tastegraph_core::schema::Store;

pub use add::run_add;
pub use graph::{run_recommend, run_reset, show_clusters, show_graph, show_neighbours};
pub use search::run_search;

/// Open the local store named by the configuration.
fn open_store(config: &Config) -> Result<Store> {
    log::debug!("Opening store at {}", config.store_path.display());
    Store::open(&config.store_path)
        .with_context(|| format!("Failed to open store at {}", config.store_path.display()))
}

/// Open a session backed by the Spotify Web API.
fn open_session(config: &Config) -> Result<Session<SpotifyClient>> {
    let client = SpotifyClient::from_config(config)?;
    let store = open_store(config)?;
    Ok(Session::open(client, store, config.viewport)?)
}

fn describe(outcome: AddOutcome) -> String {
    match outcome {
        AddOutcome::Added { edges } => format!("added ({} new edges)", edges),
        AddOutcome::AlreadyPresent => "already in the graph".to_string(),
        AddOutcome::FeaturesUnavailable => "skipped (no audio features)".to_string(),
        AddOutcome::TrackUnavailable => "skipped (track not found)".to_string(),
    }
}
