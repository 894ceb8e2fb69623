use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::Result;
use crate::model::{CanvasNode, SongEdge, SongNode};
use crate::state::{CanvasState, GraphState};

use super::migrations::MIGRATIONS;

/// Storage keys for the persisted state.
pub mod keys {
    pub const CANVAS_NODES: &str = "tastegraph-nodes";
    pub const CANVAS_BACKGROUND: &str = "tastegraph-background";
    pub const SONG_NODES: &str = "tastegraph-song-nodes";
    pub const SONG_EDGES: &str = "tastegraph-song-edges";
}

/// Local key/value storage backed by SQLite.
///
/// Values are opaque strings; the state helpers store JSON blobs and
/// replace them wholesale on every change.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a store at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Raw key/value access
impl Store {
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Parse a JSON blob. Missing keys and unparseable blobs both yield `None`;
    /// the latter is logged.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Discarding malformed stored value for {}: {}", key, e);
                Ok(None)
            }
        }
    }
}

// Song graph
impl Store {
    /// Restore the song graph.
    ///
    /// Nodes and edges are restored together: if either blob is missing or
    /// malformed, the empty graph is returned.
    pub fn load_graph(&self) -> Result<GraphState> {
        let nodes: Option<Vec<SongNode>> = self.get_json(keys::SONG_NODES)?;
        let edges: Option<Vec<SongEdge>> = self.get_json(keys::SONG_EDGES)?;
        match (nodes, edges) {
            (Some(nodes), Some(edges)) => Ok(GraphState::from_parts(nodes, edges)),
            (Some(_), None) | (None, Some(_)) => {
                log::warn!("Stored song graph is incomplete; starting from an empty graph");
                Ok(GraphState::new())
            }
            (None, None) => Ok(GraphState::new()),
        }
    }

    /// Mirror the song graph, replacing whatever was stored.
    pub fn save_graph(&self, state: &GraphState) -> Result<()> {
        let nodes = serde_json::to_string(state.nodes())?;
        let edges = serde_json::to_string(&state.edges().collect::<Vec<_>>())?;
        let tx = self.conn.unchecked_transaction()?;
        self.put(keys::SONG_NODES, &nodes)?;
        self.put(keys::SONG_EDGES, &edges)?;
        tx.commit()?;
        Ok(())
    }
}

// Canvas
impl Store {
    /// Restore the canvas. Malformed nodes fall back to an empty canvas; the
    /// background is a plain string and is restored as-is.
    pub fn load_canvas(&self) -> Result<CanvasState> {
        let mut state = CanvasState::default();
        if let Some(nodes) = self.get_json::<Vec<CanvasNode>>(keys::CANVAS_NODES)? {
            state.nodes = nodes;
        }
        if let Some(background) = self.get(keys::CANVAS_BACKGROUND)? {
            state.background = background;
        }
        Ok(state)
    }

    pub fn save_canvas(&self, state: &CanvasState) -> Result<()> {
        let nodes = serde_json::to_string(&state.nodes)?;
        let tx = self.conn.unchecked_transaction()?;
        self.put(keys::CANVAS_NODES, &nodes)?;
        self.put(keys::CANVAS_BACKGROUND, &state.background)?;
        tx.commit()?;
        Ok(())
    }
}
