//! Cancellation and deadlines for queries
//!
//! Resolvers call [`CancellationToken::check`] before every store read, so
//! a cancelled or expired request stops at the next read boundary and
//! fails as a whole.

use super::error::{XrefError, XrefResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation signal with an optional deadline
///
/// Clones share the cancellation flag, so a token handed to a query can be
/// cancelled from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Expire `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the request was cancelled or its deadline passed
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn check(&self) -> XrefResult<()> {
        if self.is_cancelled() {
            Err(XrefError::Cancelled)
        } else {
            Ok(())
        }
    }
}
