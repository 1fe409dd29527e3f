use uuid::Uuid;

use crate::{
    domain::Document,
    storage::{Filter, RequestContext},
};

/// A failure of the document store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A single-document read matched nothing.
    #[error("no document in '{collection}' matches the filter")]
    NotFound {
        /// The collection that was queried.
        collection: String,
    },

    /// The request was cancelled before the read was issued.
    #[error("request {0} was cancelled")]
    Cancelled(Uuid),

    /// The store could not be reached or failed mid-query.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query.
    #[error("invalid query on '{collection}': {reason}")]
    InvalidQuery {
        /// The collection that was queried.
        collection: String,
        /// Why the query was rejected.
        reason: String,
    },
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Read access to a document store.
///
/// Implementations must call [`RequestContext::check`] before issuing each
/// read. No transactional guarantees are expected: every call is an
/// independent read.
pub trait DocumentStore {
    /// Returns every document in `collection` matching `filter`, in store
    /// order. A missing collection yields no documents.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store fails or the request is
    /// cancelled.
    fn find(
        &self,
        ctx: &RequestContext,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError>;

    /// Returns the first matching document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when nothing matches, or any error
    /// from [`DocumentStore::find`].
    fn find_one(
        &self,
        ctx: &RequestContext,
        collection: &str,
        filter: &Filter,
    ) -> Result<Document, StoreError> {
        self.find(ctx, collection, filter)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
            })
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn find(
        &self,
        ctx: &RequestContext,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).find(ctx, collection, filter)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn find(
        &self,
        ctx: &RequestContext,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).find(ctx, collection, filter)
    }
}
