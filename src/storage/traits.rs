//! Storage trait definitions

use crate::graph::{Direction, Entry, StoredEdge, VName};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt entry: {0}")]
    CorruptEntry(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Facts of one node, keyed by fact name
pub type Facts = BTreeMap<String, Vec<u8>>;

/// Classify an entry for writing: `Some((kind, target))` for an edge,
/// `None` for a fact
///
/// An entry with only one of edge kind and target, or with an empty edge
/// kind, is neither and fails with [`StorageError::CorruptEntry`].
pub(crate) fn edge_parts(entry: &Entry) -> StorageResult<Option<(&str, &VName)>> {
    match (entry.edge_kind.as_deref(), entry.target.as_ref()) {
        (None, None) => Ok(None),
        (Some(""), _) => Err(StorageError::CorruptEntry(format!(
            "edge from {} has an empty kind",
            entry.source
        ))),
        (Some(kind), Some(target)) => Ok(Some((kind, target))),
        (Some(kind), None) => Err(StorageError::CorruptEntry(format!(
            "{kind} edge from {} has no target",
            entry.source
        ))),
        (None, Some(target)) => Err(StorageError::CorruptEntry(format!(
            "entry from {} targets {target} without an edge kind",
            entry.source
        ))),
    }
}

/// Trait for graph storage backends
///
/// The store is append-only from the reader's point of view: entries are
/// keyed by `(source, edge_kind, target, fact_name)` and writing the same
/// key again replaces its value, so repeated writes are idempotent.
///
/// Reverse edges are not inferred. The write path stores the mirror of
/// every edge (see [`Entry::mirrored`]) and [`Direction::Incoming`] reads
/// return those mirror-kind entries.
///
/// Implementations must be thread-safe (Send + Sync) to support
/// concurrent access from multiple threads.
pub trait GraphStore: Send + Sync {
    /// All facts currently stored for `vname`; empty if none
    fn read_facts(&self, vname: &VName) -> StorageResult<Facts>;

    /// All edges stored from `vname` whose kind falls in `direction`
    fn read_edges(&self, vname: &VName, direction: Direction) -> StorageResult<Vec<StoredEdge>>;

    /// Write a batch of entries
    ///
    /// A malformed edge entry fails the whole batch with
    /// [`StorageError::CorruptEntry`] before any of it is written.
    fn write(&self, batch: &[Entry]) -> StorageResult<()>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
