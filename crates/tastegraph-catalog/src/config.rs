use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tastegraph_core::layout::Viewport;

/// Default Spotify Web API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Configuration for tastegraph.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (TASTE_* prefix)
/// 3. Config file (~/.config/tastegraph/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spotify bearer token used for search and feature lookups.
    ///
    /// Can be set via:
    /// - ENV: TASTE_SPOTIFY_ACCESS_TOKEN
    /// - Config: spotify_access_token = "..."
    pub spotify_access_token: Option<String>,

    /// Base URL of the Spotify Web API.
    pub spotify_api_base: String,

    /// Path to the local state store.
    ///
    /// Can be set via:
    /// - CLI: --store /path/to/store.db
    /// - ENV: TASTE_STORE_PATH
    /// - Config: store_path = "/path/to/store.db"
    /// - Default: ~/.local/share/tastegraph/tastegraph.db
    pub store_path: PathBuf,

    /// Number of results a search returns.
    pub search_limit: u32,

    /// Area new song nodes are placed into.
    pub viewport: Viewport,

    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify_access_token: None,
            spotify_api_base: DEFAULT_API_BASE.to_string(),
            store_path: default_store_path(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            viewport: Viewport::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/tastegraph/config.toml
    /// Reads environment variables with TASTE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("taste");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom store path.
    ///
    /// This is used when the --store CLI flag is provided.
    pub fn load_with_store_path(store_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.store_path = store_path;
        Ok(config)
    }
}

/// Get the default store path.
///
/// Returns: ~/.local/share/tastegraph/tastegraph.db (or platform equivalent)
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tastegraph")
        .join("tastegraph.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/tastegraph/config.toml
/// - macOS: ~/Library/Application Support/tastegraph/config.toml
/// - Windows: %APPDATA%\tastegraph\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tastegraph")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# TasteGraph Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (TASTE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Spotify access token (bearer token) for search and audio features
#
# Can also be set via:
# - Environment: TASTE_SPOTIFY_ACCESS_TOKEN=your-token-here
#spotify_access_token = "your-spotify-access-token-here"

# Spotify Web API base URL
#spotify_api_base = "https://api.spotify.com/v1"

# Path to the local state store
#
# Holds the song graph and the free-form canvas.
#
# Can also be set via:
# - CLI: tastegraph --store /custom/path.db graph
# - Environment: TASTE_STORE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#store_path = "/path/to/custom/tastegraph.db"

# Number of results returned by a search
search_limit = 10

# Area new song nodes are placed into, in canvas pixels
[viewport]
width = 1280.0
height = 800.0

# Logging (see the twyg crate for all options)
#[logging]
#coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
