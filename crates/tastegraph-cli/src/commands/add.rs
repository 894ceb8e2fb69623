use anyhow::Result;
use tastegraph_catalog::Config;
use tastegraph_core::model::TrackId;

use super::{describe, open_session};

pub async fn run_add(config: &Config, track_ids: Vec<String>) -> Result<()> {
    let mut session = open_session(config)?;

    for raw in track_ids {
        let id = TrackId::new(raw.trim());
        let outcome = session.add_track_by_id(&id).await?;
        let name = session
            .graph()
            .node(&id)
            .map(|node| node.caption())
            .unwrap_or_else(|| id.to_string());
        println!("  {} - {}", name, describe(outcome));
    }

    println!(
        "\n✓ Graph has {} nodes and {} edges",
        session.graph().node_count(),
        session.graph().edge_count()
    );
    Ok(())
}
