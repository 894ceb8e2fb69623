//! Errors raised by the local store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The SQLite store could not be opened, migrated, read or written.
    #[error("store error: {0}")]
    Database(#[from] rusqlite::Error),

    /// State could not be encoded for storage.
    #[error("could not encode state: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
