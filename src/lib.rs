//! xrefs: query serving for a source-code cross-reference graph
//!
//! The graph is a flat, append-only set of entries: facts about nodes and
//! kind-labelled edges between them, each edge stored alongside its mirror.
//! This crate answers three questions over it:
//!
//! - **Nodes**: what is known about an entity (filtered facts)
//! - **Edges**: what an entity is connected to (edges grouped by kind)
//! - **Decorations**: a file's text with the references anchored in it
//!
//! Nodes are addressed externally by *tickets*, a reversible string
//! encoding of their [`VName`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use xrefs::{
//!     CancellationToken, Entry, GraphStore, MemoryStore, NodesRequest, VName, XrefService,
//! };
//!
//! let store = MemoryStore::new();
//! let node = VName::from_signature("main").with_corpus("demo");
//! store.write(&[Entry::fact(node.clone(), "/kythe/node/kind", "function")]).unwrap();
//!
//! let service = XrefService::new(Arc::new(store));
//! let request = NodesRequest::new([node.to_ticket()]).with_filter("**");
//! let reply = service.nodes(&request, &CancellationToken::new()).unwrap();
//! assert_eq!(reply.nodes[0].facts["/kythe/node/kind"], b"function");
//! ```

pub mod graph;
pub mod query;
mod service;
pub mod storage;

pub use graph::{schema, ticket, Direction, Entry, StoredEdge, TicketError, VName};
pub use query::{
    CancellationToken, DecorationsReply, DecorationsRequest, EdgeGroup, EdgeSet, EdgesReply,
    EdgesRequest, NodeInfo, NodesReply, NodesRequest, Reference, XrefError, XrefResult,
};
pub use service::XrefService;
pub use storage::{
    BatchOptions, GraphStore, MemoryStore, OpenStore, SqliteStore, StorageError, StorageResult,
    WriteSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
