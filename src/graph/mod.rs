//! Core graph data structures

mod entry;
pub mod schema;
pub mod ticket;
mod vname;


pub use entry::{Direction, Entry, StoredEdge};
pub use ticket::TicketError;
pub use vname::VName;
