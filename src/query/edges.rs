//! Edge lookup: outgoing edges grouped by kind

use super::context::{decode_tickets, distinct, QueryContext};
use super::error::XrefResult;
use super::filter::PatternSet;
use super::nodes::resolve_node;
use super::types::{EdgeGroup, EdgeSet, EdgesReply, EdgesRequest};
use crate::graph::{Direction, StoredEdge};
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl EdgesRequest {
    /// Resolve the edge sets of every requested ticket
    ///
    /// All edges stored from a node are considered, mirrored kinds included.
    /// A ticket requested twice yields one edge set.
    /// A node whose edges all fail the kind filters contributes neither an
    /// edge set nor a node, so `edge_sets` and `nodes` always cover the
    /// same tickets.
    pub fn execute(&self, ctx: &QueryContext<'_>) -> XrefResult<EdgesReply> {
        let vnames = distinct(decode_tickets(&self.tickets)?);
        let kinds = ctx.filters.compile_all(&self.kinds)?;
        let facts = ctx.filters.compile_all(&self.filters)?;

        let mut reply = EdgesReply::default();
        for vname in &vnames {
            let groups = group_edges(ctx.read_edges(vname, Direction::Both)?, &kinds);
            if groups.is_empty() {
                continue;
            }
            reply.edge_sets.push(EdgeSet {
                source_ticket: vname.to_ticket(),
                groups,
            });
            reply.nodes.push(resolve_node(ctx, vname, &facts)?);
        }

        debug!(
            requested = vnames.len(),
            edge_sets = reply.edge_sets.len(),
            "resolved edges"
        );
        Ok(reply)
    }
}

/// Group edges by kind, keeping selected kinds and distinct targets
///
/// Groups and targets keep the order in which the store returned them.
fn group_edges(edges: Vec<StoredEdge>, kinds: &PatternSet) -> Vec<EdgeGroup> {
    let mut groups: Vec<EdgeGroup> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<(usize, String)> = HashSet::new();

    for edge in edges {
        if !kinds.is_selected(&edge.kind) {
            continue;
        }
        let slot = *slots.entry(edge.kind.clone()).or_insert_with(|| {
            groups.push(EdgeGroup {
                kind: edge.kind.clone(),
                target_tickets: Vec::new(),
            });
            groups.len() - 1
        });
        let target = edge.target.to_ticket();
        if seen.insert((slot, target.clone())) {
            groups[slot].target_tickets.push(target);
        }
    }

    groups
}
