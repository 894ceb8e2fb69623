use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tastegraph_catalog::Config;
use tastegraph_core::model::FeatureType;
use tastegraph_core::state::EdgeFilter;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "tastegraph", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the state store (default: ~/.local/share/tastegraph/tastegraph.db)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search the Spotify catalog for tracks
    ///
    /// Prints the matching tracks with their ids. With --add, every result
    /// is added to the song graph using a single batch feature lookup.
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of results (default: search_limit from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Add every result to the graph
        #[arg(long)]
        add: bool,
    },
    /// Add tracks to the song graph by Spotify id
    ///
    /// Each new node is connected to every node already in the graph: one
    /// overall edge weighted by aggregate similarity, plus one edge for each
    /// of danceability, energy, valence, tempo and acousticness that is
    /// close enough. Tracks already in the graph are skipped.
    Add {
        /// Spotify track ids
        #[arg(required = true)]
        track_ids: Vec<String>,
    },
    /// List the nodes and edges of the song graph
    Graph {
        /// Edge filter: all, overall, danceability, energy, valence, tempo, acousticness
        #[arg(long, default_value = "all")]
        feature: EdgeFilter,
    },
    /// Show the tracks most similar to one track
    Neighbours {
        /// Spotify track id
        track_id: String,

        /// Edge filter
        #[arg(long, default_value = "overall")]
        feature: EdgeFilter,
    },
    /// Group tracks connected by one kind of similarity edge
    Clusters {
        /// danceability, energy, valence, tempo, acousticness or overall
        feature: FeatureType,
    },
    /// Ask Spotify for tracks like the ones in the graph
    Recommend {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Remove every node and edge from the song graph
    Reset,
    /// Browse the song graph in the terminal
    View {
        /// Initial edge filter
        #[arg(long, default_value = "all")]
        feature: EdgeFilter,
    },
    /// Work with the free-form canvas
    Canvas {
        #[command(subcommand)]
        action: commands::canvas::CanvasCommand,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: Option<commands::config::ConfigCommand>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.store {
        Some(path) => Config::load_with_store_path(path)?,
        None => Config::load()?,
    };

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    // Ensure store directory exists
    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::Search { query, limit, add } => {
            commands::run_search(&config, &query, limit, add).await?;
        }
        Commands::Add { track_ids } => {
            commands::run_add(&config, track_ids).await?;
        }
        Commands::Graph { feature } => {
            commands::show_graph(&config, feature)?;
        }
        Commands::Neighbours { track_id, feature } => {
            commands::show_neighbours(&config, &track_id, feature)?;
        }
        Commands::Clusters { feature } => {
            commands::show_clusters(&config, feature)?;
        }
        Commands::Recommend { limit } => {
            commands::run_recommend(&config, limit).await?;
        }
        Commands::Reset => {
            commands::run_reset(&config)?;
        }
        Commands::View { feature } => {
            tui::run_tui(&config, feature)?;
        }
        Commands::Canvas { action } => {
            commands::canvas::run(&config, action)?;
        }
        Commands::Config { action } => {
            commands::config::run(action)?;
        }
    }

    Ok(())
}
