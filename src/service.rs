//! XrefService: the single entry point for cross-reference queries
//!
//! Transports (the CLI, an RPC server, direct embedding) call the service;
//! they never drive the resolvers themselves. The service holds no
//! per-call state, so one instance can serve any number of concurrent
//! calls.

use crate::query::{
    CancellationToken, DecorationsReply, DecorationsRequest, EdgesReply, EdgesRequest, FilterCache,
    NodesReply, NodesRequest, QueryContext, XrefError, XrefResult,
};
use crate::storage::GraphStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Stateless dispatcher over a graph store
#[derive(Clone)]
pub struct XrefService {
    store: Arc<dyn GraphStore>,
    filters: Arc<FilterCache>,
}

impl XrefService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            filters: Arc::new(FilterCache::new()),
        }
    }

    /// Facts for each requested node
    pub fn nodes(
        &self,
        request: &NodesRequest,
        cancel: &CancellationToken,
    ) -> XrefResult<NodesReply> {
        require_tickets(&request.tickets)?;
        debug!(tickets = request.tickets.len(), filters = request.filters.len(), "nodes");
        self.run(cancel, |ctx| request.execute(ctx))
    }

    /// Outgoing edges of each requested node, with the nodes themselves
    pub fn edges(
        &self,
        request: &EdgesRequest,
        cancel: &CancellationToken,
    ) -> XrefResult<EdgesReply> {
        require_tickets(&request.tickets)?;
        debug!(
            tickets = request.tickets.len(),
            kinds = request.kinds.len(),
            filters = request.filters.len(),
            "edges"
        );
        self.run(cancel, |ctx| request.execute(ctx))
    }

    /// Source text and references of a file
    pub fn decorations(
        &self,
        request: &DecorationsRequest,
        cancel: &CancellationToken,
    ) -> XrefResult<DecorationsReply> {
        if request.ticket.is_empty() {
            return Err(XrefError::InvalidRequest("missing file ticket".into()));
        }
        debug!(
            ticket = %request.ticket,
            source_text = request.source_text,
            references = request.references,
            "decorations"
        );
        self.run(cancel, |ctx| request.execute(ctx))
    }

    fn run<T>(
        &self,
        cancel: &CancellationToken,
        query: impl FnOnce(&QueryContext<'_>) -> XrefResult<T>,
    ) -> XrefResult<T> {
        let ctx = QueryContext::new(self.store.as_ref(), &self.filters, cancel);
        query(&ctx).inspect_err(|e| {
            if matches!(e, XrefError::Cancelled | XrefError::StoreUnavailable(_)) {
                warn!(error = %e, "query aborted");
            }
        })
    }
}

fn require_tickets(tickets: &[String]) -> XrefResult<()> {
    if tickets.is_empty() {
        return Err(XrefError::InvalidRequest("at least one ticket is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::schema::NODE_KIND_FACT;
    use crate::graph::{Entry, VName};
    use crate::storage::MemoryStore;

    fn service() -> XrefService {
        let store = MemoryStore::new();
        store
            .write(&[Entry::fact(VName::from_signature("n"), NODE_KIND_FACT, "record")])
            .unwrap();
        XrefService::new(Arc::new(store))
    }

    #[test]
    fn empty_ticket_lists_are_rejected() {
        let service = service();
        let cancel = CancellationToken::new();

        let nodes = service.nodes(&NodesRequest::default(), &cancel);
        assert!(matches!(nodes, Err(XrefError::InvalidRequest(_))));

        let edges = service.edges(&EdgesRequest::default(), &cancel);
        assert!(matches!(edges, Err(XrefError::InvalidRequest(_))));

        let decorations = service.decorations(&DecorationsRequest::default(), &cancel);
        assert!(matches!(decorations, Err(XrefError::InvalidRequest(_))));
    }

    #[test]
    fn filters_are_cached_across_calls() {
        let service = service();
        let cancel = CancellationToken::new();
        let request = NodesRequest::new([VName::from_signature("n").to_ticket()]).with_filter("**");

        service.nodes(&request, &cancel).unwrap();
        service.nodes(&request, &cancel).unwrap();
        assert_eq!(service.filters.len(), 1);
    }

    #[test]
    fn cancelled_calls_fail_whole() {
        let service = service();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = NodesRequest::new([VName::from_signature("n").to_ticket()]).with_filter("**");

        assert!(matches!(service.nodes(&request, &cancel), Err(XrefError::Cancelled)));
    }
}
