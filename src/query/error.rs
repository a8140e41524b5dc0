//! Errors returned by the cross-reference queries

use crate::graph::TicketError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while answering a query
///
/// Any error aborts the whole call; no partial reply is produced.
#[derive(Debug, Error)]
pub enum XrefError {
    #[error("Invalid ticket {ticket:?}: {source}")]
    InvalidTicket {
        ticket: String,
        #[source]
        source: TicketError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("Request cancelled")]
    Cancelled,
}

/// Result type for query operations
pub type XrefResult<T> = Result<T, XrefError>;
