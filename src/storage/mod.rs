//! Storage backends for the cross-reference graph
//!
//! Resolvers read through the `GraphStore` trait. `SqliteStore` is the
//! persistent backend; `MemoryStore` serves tests and embedding. The
//! `batch` module is the bulk-load path that feeds either of them.

pub mod batch;
mod memory;
mod sqlite;
mod traits;

pub use batch::{BatchOptions, WriteSummary, DEFAULT_BATCH_SIZE};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Facts, GraphStore, OpenStore, StorageError, StorageResult};
