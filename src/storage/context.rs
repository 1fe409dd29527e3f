use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use uuid::Uuid;

use crate::storage::StoreError;

/// Per-request context threaded through every store call.
///
/// Clones share the cancellation flag, so a caller can keep one clone and
/// cancel the build running with another.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancelled: Arc<AtomicBool>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// Creates a context with a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(Uuid::new_v4())
    }

    /// Creates a context for an existing request id.
    #[must_use]
    pub fn with_request_id(request_id: Uuid) -> Self {
        Self {
            request_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The request id, for correlating log lines.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Cancels the request. Subsequent store calls fail.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`RequestContext::cancel`] has been called on any
    /// clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fails with [`StoreError::Cancelled`] if the request was cancelled.
    ///
    /// Stores call this before every read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cancelled`] after cancellation.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_cancelled() {
            Err(StoreError::Cancelled(self.request_id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();

        assert!(ctx.check().is_ok());
        handle.cancel();

        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.check(), Err(StoreError::Cancelled(id)) if id == ctx.request_id()));
    }

    #[test]
    fn fresh_contexts_have_distinct_ids() {
        assert_ne!(
            RequestContext::new().request_id(),
            RequestContext::new().request_id()
        );
    }
}
