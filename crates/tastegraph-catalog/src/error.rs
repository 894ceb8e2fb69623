//! Error types for catalog access.

use thiserror::Error;

/// Errors that can occur while talking to the catalog or persisting the
/// resulting state.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP request to the catalog failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The catalog returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The access token was rejected.
    #[error("{source_name} rejected the access token")]
    Unauthorized { source_name: String },

    /// The requested entity does not exist in the catalog.
    #[error("not found: {entity} at {source_name}")]
    NotFound { entity: String, source_name: String },

    /// A catalog response could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// An error propagated from the local store.
    #[error("store error: {0}")]
    Store(#[from] tastegraph_core::Error),

    /// No access token is configured.
    #[error("no Spotify access token configured (set TASTE_SPOTIFY_ACCESS_TOKEN or spotify_access_token in the config file)")]
    MissingToken,

    /// The configured API base URL cannot be used.
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),
}

impl CatalogError {
    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
