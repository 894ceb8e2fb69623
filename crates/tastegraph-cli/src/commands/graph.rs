use anyhow::Result;
use tastegraph_catalog::Config;
use tastegraph_core::model::{FeatureType, TrackId};
use tastegraph_core::state::{EdgeFilter, GraphAction, GraphState};
use tastegraph_core::Thresholds;
use tastegraph_graph::SimilarityGraph;

use super::{open_session, open_store};

fn caption(state: &GraphState, id: &TrackId) -> String {
    state
        .node(id)
        .map(|node| node.caption())
        .unwrap_or_else(|| id.to_string())
}

pub fn show_graph(config: &Config, filter: EdgeFilter) -> Result<()> {
    let state = open_store(config)?.load_graph()?;

    println!("\n🎵 Song Graph\n");
    println!("  Store: {}", config.store_path.display());
    println!("  Nodes: {}", state.node_count());
    println!("  Edges: {} ({} shown)", state.edge_count(), state.filtered_edges(filter).count());

    if state.is_empty() {
        println!("\n  Run `tastegraph search <query>` to find tracks to add");
        return Ok(());
    }

    println!("\n  Tracks:");
    for node in state.nodes() {
        println!("    {}  [{}]", node.caption(), node.id);
    }

    println!("\n  Connections ({}):", filter);
    for edge in state.filtered_edges(filter) {
        println!(
            "    {:<13} {:.3}  {}  ↔  {}",
            edge.feature_type,
            edge.similarity_score,
            caption(&state, &edge.source),
            caption(&state, &edge.target)
        );
    }

    Ok(())
}

pub fn show_neighbours(config: &Config, track_id: &str, filter: EdgeFilter) -> Result<()> {
    let state = open_store(config)?.load_graph()?;
    let graph = SimilarityGraph::from_state(&state, filter);
    let id = TrackId::new(track_id);
    let neighbours = graph.neighbours(&id)?;

    println!("\nMost similar to {} ({}):\n", caption(&state, &id), filter);
    if neighbours.is_empty() {
        println!("  (no connections)");
    }
    for n in neighbours {
        println!(
            "  {:.3}  {:<13} {}",
            n.similarity_score,
            n.feature_type,
            caption(&state, &n.track)
        );
    }
    Ok(())
}

pub fn show_clusters(config: &Config, feature: FeatureType) -> Result<()> {
    let state = open_store(config)?.load_graph()?;
    let graph = SimilarityGraph::from_state(&state, EdgeFilter::Only(feature));
    let clusters = graph.clusters();

    println!(
        "\nClusters by {} ({} tracks, {} connections):\n",
        feature.label(),
        graph.node_count(),
        graph.edge_count()
    );
    for (i, members) in clusters.iter().enumerate() {
        println!("  Group {} ({} tracks)", i + 1, members.len());
        for id in members {
            println!("    {}", caption(&state, id));
        }
    }
    Ok(())
}

pub async fn run_recommend(config: &Config, limit: u32) -> Result<()> {
    let session = open_session(config)?;
    if session.graph().is_empty() {
        println!("The graph is empty; add some tracks first.");
        return Ok(());
    }

    let tracks = session.recommend(limit).await;
    if tracks.is_empty() {
        println!("No recommendations available.");
        return Ok(());
    }

    println!("\nRecommended tracks:\n");
    for track in tracks {
        println!("  {} - {}  [{}]", track.name, track.artist_line(), track.id);
    }
    Ok(())
}

pub fn run_reset(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let previous = store.load_graph()?;
    let state = previous.apply(GraphAction::Reset, &Thresholds::DEFAULT);
    store.save_graph(&state)?;
    log::info!(
        "Cleared {} nodes and {} edges",
        previous.node_count(),
        previous.edge_count()
    );
    println!("✓ Song graph cleared");
    Ok(())
}
