//! In-process graph store

use super::traits::{edge_parts, Facts, GraphStore, StorageResult};
use crate::graph::{Direction, Entry, StoredEdge, VName};
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Edge key: (kind, target, annotation name)
type EdgeKey = (String, VName, String);

#[derive(Debug, Default)]
struct NodeEntries {
    facts: Facts,
    edges: BTreeMap<EdgeKey, Vec<u8>>,
}

/// Graph store held entirely in memory
///
/// Entries are sharded by source VName in a `DashMap`, so reads of
/// different nodes never contend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: DashMap<VName, NodeEntries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct entries held
    pub fn entry_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.facts.len() + node.edges.len())
            .sum()
    }
}

impl GraphStore for MemoryStore {
    fn read_facts(&self, vname: &VName) -> StorageResult<Facts> {
        Ok(self
            .nodes
            .get(vname)
            .map(|node| node.facts.clone())
            .unwrap_or_default())
    }

    fn read_edges(&self, vname: &VName, direction: Direction) -> StorageResult<Vec<StoredEdge>> {
        let Some(node) = self.nodes.get(vname) else {
            return Ok(Vec::new());
        };
        Ok(node
            .edges
            .iter()
            .filter(|((kind, _, _), _)| direction.admits(kind))
            .map(|((kind, target, name), value)| StoredEdge {
                kind: kind.clone(),
                target: target.clone(),
                annotation: (name.clone(), value.clone()),
            })
            .collect())
    }

    fn write(&self, batch: &[Entry]) -> StorageResult<()> {
        let parts = batch.iter().map(edge_parts).collect::<StorageResult<Vec<_>>>()?;
        for (entry, edge) in batch.iter().zip(parts) {
            let mut node = self.nodes.entry(entry.source.clone()).or_default();
            match edge {
                Some((kind, target)) => {
                    let key = (kind.to_string(), target.clone(), entry.fact_name.clone());
                    node.edges.insert(key, entry.fact_value.clone());
                }
                None => {
                    node.facts
                        .insert(entry.fact_name.clone(), entry.fact_value.clone());
                }
            }
        }
        Ok(())
    }
}
