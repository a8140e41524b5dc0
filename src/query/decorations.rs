//! Decorations: a file's text plus the references anchored in it
//!
//! Resolution is a fixed two-hop pipeline:
//!
//! 1. file -> anchors, through the mirrored child-of edges stored on the
//!    file, keeping nodes whose kind fact is `anchor`;
//! 2. anchor -> targets, through each anchor's forward reference edges.
//!
//! Nothing deeper is followed.

use super::context::{decode_ticket, QueryContext};
use super::error::{XrefError, XrefResult};
use super::types::{DecorationsReply, DecorationsRequest, NodeInfo, Reference};
use crate::graph::schema::{
    is_ref_edge, mirror_edge, ANCHOR_KIND, CHILD_OF_EDGE, FILE_ENCODING_FACT, FILE_TEXT_FACT,
    NODE_KIND_FACT,
};
use crate::graph::{Direction, VName};
use crate::storage::Facts;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

impl DecorationsRequest {
    pub fn execute(&self, ctx: &QueryContext<'_>) -> XrefResult<DecorationsReply> {
        let file = decode_ticket(&self.ticket)?;
        let file_facts = ctx.read_facts(&file)?;
        if file_facts.is_empty() {
            warn!(ticket = %self.ticket, "decorations requested for unknown file");
            return Err(XrefError::NotFound(self.ticket.clone()));
        }

        let mut reply = DecorationsReply {
            ticket: self.ticket.clone(),
            ..Default::default()
        };

        if self.source_text {
            reply.source_text = file_facts.get(FILE_TEXT_FACT).cloned().unwrap_or_default();
            reply.encoding = file_facts
                .get(FILE_ENCODING_FACT)
                .map(|value| String::from_utf8_lossy(value).into_owned())
                .unwrap_or_default();
        }

        if self.references {
            let (references, nodes) = resolve_references(ctx, &file)?;
            reply.references = references;
            reply.nodes = nodes;
        }

        debug!(
            ticket = %self.ticket,
            references = reply.references.len(),
            nodes = reply.nodes.len(),
            "resolved decorations"
        );
        Ok(reply)
    }
}

/// Nodes with a child-of edge to `file` whose kind is anchor, with their facts
fn file_anchors(ctx: &QueryContext<'_>, file: &VName) -> XrefResult<Vec<(VName, Facts)>> {
    let reverse_child_of = mirror_edge(CHILD_OF_EDGE);
    let mut seen = HashSet::new();
    let mut anchors = Vec::new();

    for edge in ctx.read_edges(file, Direction::Incoming)? {
        if edge.kind != reverse_child_of || !seen.insert(edge.target.clone()) {
            continue;
        }
        let facts = ctx.read_facts(&edge.target)?;
        let is_anchor = facts
            .get(NODE_KIND_FACT)
            .is_some_and(|kind| kind.as_slice() == ANCHOR_KIND.as_bytes());
        if is_anchor {
            anchors.push((edge.target, facts));
        }
    }

    Ok(anchors)
}

/// Compose both hops into references plus every node they touch
fn resolve_references(
    ctx: &QueryContext<'_>,
    file: &VName,
) -> XrefResult<(Vec<Reference>, Vec<NodeInfo>)> {
    let mut references = Vec::new();
    let mut seen_refs = HashSet::new();
    // keyed by ticket so each node is read and reported once
    let mut nodes: BTreeMap<String, NodeInfo> = BTreeMap::new();

    for (anchor, facts) in file_anchors(ctx, file)? {
        let anchor_ticket = anchor.to_ticket();
        nodes
            .entry(anchor_ticket.clone())
            .or_insert_with(|| NodeInfo::new(anchor_ticket.clone(), facts));

        for edge in ctx.read_edges(&anchor, Direction::Outgoing)? {
            if !is_ref_edge(&edge.kind) {
                continue;
            }
            let target_ticket = edge.target.to_ticket();
            if !nodes.contains_key(&target_ticket) {
                let target_facts = ctx.read_facts(&edge.target)?;
                nodes.insert(
                    target_ticket.clone(),
                    NodeInfo::new(target_ticket.clone(), target_facts),
                );
            }
            let reference = Reference {
                source_ticket: anchor_ticket.clone(),
                kind: edge.kind,
                target_ticket,
            };
            if seen_refs.insert(reference.clone()) {
                references.push(reference);
            }
        }
    }

    Ok((references, nodes.into_values().collect()))
}
