//! Shared fixture for the integration tests
//!
//! A small graph: an orphan node, a file with one anchor referencing a
//! record, and a pair of nodes joined by a custom edge kind. Mirror edges
//! are written explicitly, as an indexer's write path would.

use std::collections::BTreeMap;
use xrefs::schema::{
    mirror_edge, ANCHOR_KIND, CHILD_OF_EDGE, FILE_ENCODING_FACT, FILE_KIND, FILE_TEXT_FACT,
    NODE_KIND_FACT, REF_EDGE,
};
use xrefs::{EdgeGroup, EdgeSet, Entry, NodeInfo, VName};

pub const FILE_CONTENT: &str = "file_content";
pub const FILE_ENCODING: &str = "UTF-8";

pub struct TestNode {
    pub vname: VName,
    /// fact name -> value
    pub facts: Vec<(&'static str, &'static str)>,
    /// edge kind -> targets
    pub edges: Vec<(String, Vec<VName>)>,
}

impl TestNode {
    pub fn ticket(&self) -> String {
        self.vname.to_ticket()
    }

    pub fn info(&self) -> NodeInfo {
        let facts = self
            .facts
            .iter()
            .map(|(name, value)| (name.to_string(), value.as_bytes().to_vec()))
            .collect::<BTreeMap<_, _>>();
        NodeInfo::new(self.ticket(), facts)
    }

    pub fn edge_set(&self) -> Option<EdgeSet> {
        if self.edges.is_empty() {
            return None;
        }
        let groups = self
            .edges
            .iter()
            .map(|(kind, targets)| EdgeGroup {
                kind: kind.clone(),
                target_tickets: targets.iter().map(VName::to_ticket).collect(),
            })
            .collect();
        Some(EdgeSet {
            source_ticket: self.ticket(),
            groups,
        })
    }

    pub fn entries(&self) -> Vec<Entry> {
        let facts = self
            .facts
            .iter()
            .map(|(name, value)| Entry::fact(self.vname.clone(), *name, *value));
        let edges = self.edges.iter().flat_map(move |(kind, targets)| {
            targets
                .iter()
                .map(move |target| Entry::edge(self.vname.clone(), kind.clone(), target.clone()))
        });
        facts.chain(edges).collect()
    }
}

pub fn sig(signature: &str) -> VName {
    VName::from_signature(signature)
}

pub fn file_vname() -> VName {
    sig("testFileNode")
}

pub fn anchor_vname() -> VName {
    sig("testAnchor")
}

pub fn anchor_target_vname() -> VName {
    sig("someSemanticNode")
}

/// Fixture nodes; index 0 is the orphan, 4 and 5 the anchor and its target
pub fn test_nodes() -> Vec<TestNode> {
    vec![
        TestNode {
            vname: sig("orphanedNode"),
            facts: vec![(NODE_KIND_FACT, "orphan")],
            edges: vec![],
        },
        TestNode {
            vname: file_vname(),
            facts: vec![
                (NODE_KIND_FACT, FILE_KIND),
                (FILE_TEXT_FACT, FILE_CONTENT),
                (FILE_ENCODING_FACT, FILE_ENCODING),
            ],
            edges: vec![(mirror_edge(CHILD_OF_EDGE), vec![anchor_vname()])],
        },
        TestNode {
            vname: sig("sig2"),
            facts: vec![(NODE_KIND_FACT, "test")],
            edges: vec![("someEdgeKind".to_string(), vec![sig("signature")])],
        },
        TestNode {
            vname: sig("signature"),
            facts: vec![(NODE_KIND_FACT, "test")],
            edges: vec![(mirror_edge("someEdgeKind"), vec![sig("sig2")])],
        },
        TestNode {
            vname: anchor_vname(),
            facts: vec![(NODE_KIND_FACT, ANCHOR_KIND)],
            edges: vec![
                (CHILD_OF_EDGE.to_string(), vec![file_vname()]),
                (REF_EDGE.to_string(), vec![anchor_target_vname()]),
            ],
        },
        TestNode {
            vname: anchor_target_vname(),
            facts: vec![(NODE_KIND_FACT, "record")],
            edges: vec![(mirror_edge(REF_EDGE), vec![anchor_vname()])],
        },
    ]
}

pub fn test_entries(nodes: &[TestNode]) -> Vec<Entry> {
    nodes.iter().flat_map(TestNode::entries).collect()
}

pub fn tickets(nodes: &[TestNode]) -> Vec<String> {
    nodes.iter().map(TestNode::ticket).collect()
}

pub fn infos(nodes: &[TestNode]) -> Vec<NodeInfo> {
    let mut infos: Vec<_> = nodes.iter().map(TestNode::info).collect();
    xrefs::query::sort_nodes(&mut infos);
    infos
}

pub fn edge_sets(nodes: &[TestNode]) -> Vec<EdgeSet> {
    let mut sets: Vec<_> = nodes.iter().filter_map(TestNode::edge_set).collect();
    xrefs::query::sort_edge_sets(&mut sets);
    sets
}
