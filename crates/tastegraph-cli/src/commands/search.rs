use anyhow::Result;
use tastegraph_catalog::Config;

use super::{describe, open_session};

pub async fn run_search(config: &Config, query: &str, limit: Option<u32>, add: bool) -> Result<()> {
    let mut session = open_session(config)?;
    let limit = limit.unwrap_or(config.search_limit);

    let tracks = session.search(query, limit).await;
    if tracks.is_empty() {
        println!("No tracks found for {:?}", query);
        return Ok(());
    }

    println!("\n🔎 Search Results\n");
    for (i, track) in tracks.iter().enumerate() {
        println!(
            "  {:>2}. {} - {}  [{}]  popularity {}",
            i + 1,
            track.name,
            track.artist_line(),
            track.id,
            track.popularity
        );
        if let Some(art) = track.thumbnail_url() {
            println!("      {}", art);
        }
    }

    if add {
        println!();
        let outcomes = session.add_tracks(&tracks).await?;
        for (track, outcome) in tracks.iter().zip(outcomes) {
            println!("  {} - {}", track.name, describe(outcome));
        }
        println!(
            "\n✓ Graph now has {} nodes and {} edges",
            session.graph().node_count(),
            session.graph().edge_count()
        );
    } else {
        println!("\n  Run `tastegraph add <id>` to add a track to the graph");
    }

    Ok(())
}
