//! Query system for the cross-reference graph
//!
//! Three resolvers answer the client questions: node lookup, edge lookup
//! and file decorations. Each request type carries an `execute` method
//! that runs it against a [`QueryContext`].

mod cancel;
mod context;
mod decorations;
mod edges;
mod error;
pub mod filter;
mod nodes;
mod types;

pub use cancel::CancellationToken;
pub use context::QueryContext;
pub use error::{XrefError, XrefResult};
pub use filter::{FilterCache, PatternSet};
pub use types::{
    sort_edge_sets, sort_nodes, sort_references, DecorationsReply, DecorationsRequest, EdgeGroup,
    EdgeSet, EdgesReply, EdgesRequest, NodeInfo, NodesReply, NodesRequest, Reference,
};
