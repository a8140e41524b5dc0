//! Entry: the atomic unit of stored graph data

use super::schema::{is_reverse_edge, mirror_edge, EDGE_ANNOTATION_MARKER};
use super::vname::VName;
use serde::{Deserialize, Serialize};

/// A single stored fact or edge
///
/// Without an edge kind the entry is a fact `fact_name -> fact_value` of
/// `source`. With one it is an edge `source -[edge_kind]-> target` whose
/// fact name/value carry an edge-scoped annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub source: VName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<VName>,
    pub fact_name: String,
    #[serde(default)]
    pub fact_value: Vec<u8>,
}

impl Entry {
    /// A fact of `source`
    pub fn fact(source: VName, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            source,
            edge_kind: None,
            target: None,
            fact_name: name.into(),
            fact_value: value.into(),
        }
    }

    /// An unannotated edge from `source` to `target`
    pub fn edge(source: VName, kind: impl Into<String>, target: VName) -> Self {
        Self {
            source,
            edge_kind: Some(kind.into()),
            target: Some(target),
            fact_name: EDGE_ANNOTATION_MARKER.to_string(),
            fact_value: Vec::new(),
        }
    }

    /// Attach an annotation to an edge entry
    pub fn with_annotation(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.fact_name = name.into();
        self.fact_value = value.into();
        self
    }

    /// Returns the edge kind and target if this entry is an edge
    pub fn as_edge(&self) -> Option<(&str, &VName)> {
        match (&self.edge_kind, &self.target) {
            (Some(kind), Some(target)) => Some((kind.as_str(), target)),
            _ => None,
        }
    }

    pub fn is_edge(&self) -> bool {
        self.as_edge().is_some()
    }

    /// The reverse edge required by the mirroring invariant
    pub fn mirrored(&self) -> Option<Entry> {
        let (kind, target) = self.as_edge()?;
        Some(Entry {
            source: target.clone(),
            edge_kind: Some(mirror_edge(kind)),
            target: Some(self.source.clone()),
            fact_name: self.fact_name.clone(),
            fact_value: self.fact_value.clone(),
        })
    }
}

/// Direction of edge reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Edges stored under a forward kind
    #[default]
    Outgoing,
    /// Edges stored under a mirrored kind
    Incoming,
    /// Every stored edge, whatever its kind
    Both,
}

impl Direction {
    /// Whether an edge labelled `kind` is read in this direction
    pub fn admits(self, kind: &str) -> bool {
        match self {
            Direction::Outgoing => !is_reverse_edge(kind),
            Direction::Incoming => is_reverse_edge(kind),
            Direction::Both => true,
        }
    }
}

/// One edge as returned by a store read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEdge {
    pub kind: String,
    pub target: VName,
    /// Annotation fact name and value
    pub annotation: (String, Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::schema::CHILD_OF_EDGE;

    #[test]
    fn mirrored_edge_swaps_endpoints() {
        let anchor = VName::from_signature("anchor");
        let file = VName::from_signature("file");
        let edge = Entry::edge(anchor.clone(), CHILD_OF_EDGE, file.clone());

        let reverse = edge.mirrored().unwrap();
        assert_eq!(reverse.source, file);
        assert_eq!(reverse.target, Some(anchor));
        assert_eq!(reverse.edge_kind.as_deref(), Some("%/kythe/edge/childof"));
        assert_eq!(reverse.mirrored(), Some(edge));
    }

    #[test]
    fn facts_have_no_mirror() {
        let fact = Entry::fact(VName::from_signature("x"), "/kythe/node/kind", "record");
        assert!(!fact.is_edge());
        assert!(fact.mirrored().is_none());
    }

    #[test]
    fn direction_admits_kinds() {
        assert!(Direction::Outgoing.admits(CHILD_OF_EDGE));
        assert!(!Direction::Incoming.admits(CHILD_OF_EDGE));
        assert!(Direction::Incoming.admits("%/kythe/edge/childof"));
        assert!(Direction::Both.admits("%/kythe/edge/childof"));
    }

    #[test]
    fn entry_json_omits_absent_edge_fields() {
        let fact = Entry::fact(VName::from_signature("x"), "/kythe/text", "hi");
        let json = serde_json::to_value(&fact).unwrap();
        assert!(json.get("edge_kind").is_none());
        assert!(json.get("target").is_none());
        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, fact);
    }
}
