//! Per-call view of the store shared by the resolvers

use super::cancel::CancellationToken;
use super::error::{XrefError, XrefResult};
use super::filter::FilterCache;
use crate::graph::{ticket, Direction, StoredEdge, VName};
use crate::storage::{Facts, GraphStore};
use std::collections::HashSet;

/// Everything a resolver needs for one call
///
/// Every store read goes through here so that cancellation is checked
/// at each read boundary.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub store: &'a dyn GraphStore,
    pub filters: &'a FilterCache,
    pub cancel: &'a CancellationToken,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        store: &'a dyn GraphStore,
        filters: &'a FilterCache,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            store,
            filters,
            cancel,
        }
    }

    pub fn read_facts(&self, vname: &VName) -> XrefResult<Facts> {
        self.cancel.check()?;
        Ok(self.store.read_facts(vname)?)
    }

    pub fn read_edges(&self, vname: &VName, direction: Direction) -> XrefResult<Vec<StoredEdge>> {
        self.cancel.check()?;
        Ok(self.store.read_edges(vname, direction)?)
    }
}

pub(crate) fn decode_ticket(ticket: &str) -> XrefResult<VName> {
    ticket::decode(ticket).map_err(|source| XrefError::InvalidTicket {
        ticket: ticket.to_string(),
        source,
    })
}

/// Decode a batch of tickets, one VName per ticket, repeats included
///
/// The first malformed ticket fails the whole batch.
pub(crate) fn decode_tickets(tickets: &[String]) -> XrefResult<Vec<VName>> {
    tickets.iter().map(|ticket| decode_ticket(ticket)).collect()
}

/// Drop repeated VNames, keeping first occurrences in order
pub(crate) fn distinct(vnames: Vec<VName>) -> Vec<VName> {
    let mut seen = HashSet::new();
    vnames
        .into_iter()
        .filter(|vname| seen.insert(vname.clone()))
        .collect()
}
