//! Node lookup: filtered facts for a batch of tickets

use super::context::{decode_tickets, QueryContext};
use super::error::XrefResult;
use super::filter::PatternSet;
use super::types::{NodeInfo, NodesReply, NodesRequest};
use crate::graph::VName;
use tracing::debug;

impl NodesRequest {
    /// Resolve every requested ticket to a node
    ///
    /// Each requested ticket yields exactly one node, in request order and
    /// repeats included, even when none of its facts survive the filters or
    /// it has no facts at all.
    pub fn execute(&self, ctx: &QueryContext<'_>) -> XrefResult<NodesReply> {
        let vnames = decode_tickets(&self.tickets)?;
        let patterns = ctx.filters.compile_all(&self.filters)?;

        let nodes = vnames
            .iter()
            .map(|vname| resolve_node(ctx, vname, &patterns))
            .collect::<XrefResult<Vec<_>>>()?;

        debug!(nodes = nodes.len(), "resolved nodes");
        Ok(NodesReply { nodes })
    }
}

/// Read `vname`'s facts, keeping those selected by `patterns`
pub(crate) fn resolve_node(
    ctx: &QueryContext<'_>,
    vname: &VName,
    patterns: &PatternSet,
) -> XrefResult<NodeInfo> {
    let mut facts = ctx.read_facts(vname)?;
    facts.retain(|name, _| patterns.is_selected(name));
    Ok(NodeInfo::new(vname.to_ticket(), facts))
}
