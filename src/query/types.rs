//! Request and reply types for the cross-reference queries
//!
//! Orderings inside replies are unspecified. Use the `sort_*` helpers to
//! put a reply in canonical order (ticket, then kind, then target) before
//! comparing it.

use crate::storage::Facts;
use serde::{Deserialize, Serialize};

/// Facts of a node, keyed by ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub ticket: String,
    pub facts: Facts,
}

impl NodeInfo {
    pub fn new(ticket: impl Into<String>, facts: Facts) -> Self {
        Self {
            ticket: ticket.into(),
            facts,
        }
    }
}

/// Targets of one edge kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeGroup {
    pub kind: String,
    pub target_tickets: Vec<String>,
}

/// Outgoing edges of one node, grouped by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSet {
    pub source_ticket: String,
    pub groups: Vec<EdgeGroup>,
}

/// A span-like node linked to the entity it denotes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    pub source_ticket: String,
    pub kind: String,
    pub target_ticket: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodesRequest {
    pub tickets: Vec<String>,
    /// Fact-name patterns; facts matching none of them are dropped
    #[serde(default)]
    pub filters: Vec<String>,
}

impl NodesRequest {
    pub fn new<I, T>(tickets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tickets: tickets.into_iter().map(Into::into).collect(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filters.push(pattern.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesReply {
    pub nodes: Vec<NodeInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgesRequest {
    pub tickets: Vec<String>,
    /// Edge-kind patterns; kinds matching none of them are dropped
    #[serde(default)]
    pub kinds: Vec<String>,
    /// Fact-name patterns for the embedded source nodes
    #[serde(default)]
    pub filters: Vec<String>,
}

impl EdgesRequest {
    pub fn new<I, T>(tickets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tickets: tickets.into_iter().map(Into::into).collect(),
            kinds: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_kind(mut self, pattern: impl Into<String>) -> Self {
        self.kinds.push(pattern.into());
        self
    }

    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filters.push(pattern.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgesReply {
    pub edge_sets: Vec<EdgeSet>,
    /// One node per edge set, matched by ticket
    pub nodes: Vec<NodeInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecorationsRequest {
    /// Ticket of the file node
    pub ticket: String,
    #[serde(default)]
    pub source_text: bool,
    #[serde(default)]
    pub references: bool,
}

impl DecorationsRequest {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self {
            ticket: ticket.into(),
            source_text: false,
            references: false,
        }
    }

    pub fn with_source_text(mut self) -> Self {
        self.source_text = true;
        self
    }

    pub fn with_references(mut self) -> Self {
        self.references = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationsReply {
    pub ticket: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_text: Vec<u8>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encoding: String,
    pub references: Vec<Reference>,
    /// Every anchor and target touched while resolving `references`
    pub nodes: Vec<NodeInfo>,
}

pub fn sort_nodes(nodes: &mut [NodeInfo]) {
    nodes.sort_by(|a, b| a.ticket.cmp(&b.ticket));
}

pub fn sort_edge_sets(sets: &mut [EdgeSet]) {
    sets.sort_by(|a, b| a.source_ticket.cmp(&b.source_ticket));
    for set in sets.iter_mut() {
        set.groups.sort_by(|a, b| a.kind.cmp(&b.kind));
        for group in &mut set.groups {
            group.target_tickets.sort();
        }
    }
}

pub fn sort_references(refs: &mut [Reference]) {
    refs.sort();
}

impl NodesReply {
    /// Put the reply in canonical order
    pub fn sorted(mut self) -> Self {
        sort_nodes(&mut self.nodes);
        self
    }
}

impl EdgesReply {
    pub fn sorted(mut self) -> Self {
        sort_edge_sets(&mut self.edge_sets);
        sort_nodes(&mut self.nodes);
        self
    }
}

impl DecorationsReply {
    pub fn sorted(mut self) -> Self {
        sort_references(&mut self.references);
        sort_nodes(&mut self.nodes);
        self
    }
}
