use crate::{
    domain::{ConfigError, FieldError, InstanceKey},
    storage::{CatalogError, StoreError},
};

/// Errors that abort a topology build.
///
/// Every variant is fatal; no partial tree is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum TopoError {
    /// The mainline model cannot produce a usable spine.
    #[error("invalid mainline model: {0}")]
    Configuration(#[from] ConfigError),

    /// The mainline model could not be read.
    #[error("failed to read mainline model: {0}")]
    Catalog(#[from] CatalogError),

    /// A referenced parent does not exist anywhere.
    #[error("business {business}: parent {parent} of {child} does not exist")]
    MissingParent {
        /// The business being built.
        business: i64,
        /// The instance whose parent is missing.
        child: InstanceKey,
        /// The parent the instance refers to.
        parent: InstanceKey,
    },

    /// A parent instance id matched more than one document.
    #[error(
        "business {business}: parent id {parent_id} of {child} matches {matches} instances"
    )]
    AmbiguousParent {
        /// The business being built.
        business: i64,
        /// The instance whose parent is ambiguous.
        child: InstanceKey,
        /// The parent instance id that was looked up.
        parent_id: i64,
        /// How many documents matched.
        matches: usize,
    },

    /// A parent lookup found a document of the wrong object type.
    #[error("business {business}: parent of {child} should be {expected}, found {found}")]
    ParentTypeMismatch {
        /// The business being built.
        business: i64,
        /// The instance whose parent was looked up.
        child: InstanceKey,
        /// The parent the instance refers to.
        expected: InstanceKey,
        /// The document that was found instead.
        found: InstanceKey,
    },

    /// Two records share an identity key.
    #[error("business {business}: instance {key} appears more than once")]
    DuplicateInstance {
        /// The business being built.
        business: i64,
        /// The duplicated key.
        key: InstanceKey,
    },

    /// A non-root instance has no parent.
    #[error("business {business}: instance {key} has no parent")]
    Orphan {
        /// The business being built.
        business: i64,
        /// The instance without a parent.
        key: InstanceKey,
    },

    /// Parent links form a cycle.
    #[error("business {business}: parent links of {key} form a cycle")]
    Cycle {
        /// The business being built.
        business: i64,
        /// One instance on the cycle.
        key: InstanceKey,
    },

    /// Detail was requested but the business record does not exist.
    #[error("business {0} not found")]
    BusinessNotFound(i64),

    /// A required numeric field is absent or not an integer.
    #[error("business {business}: {source}")]
    FieldType {
        /// The business being built.
        business: i64,
        /// The field failure.
        source: FieldError,
    },

    /// The document store failed.
    #[error("business {business}: reading '{collection}' failed: {source}")]
    Store {
        /// The business being built.
        business: i64,
        /// The collection being read.
        collection: String,
        /// The store failure.
        source: StoreError,
    },
}

/// The broad class of a [`TopoError`], for callers that map errors to
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The mainline model is unusable.
    Configuration,
    /// The instance data is inconsistent.
    DataIntegrity,
    /// A document field has the wrong type.
    FieldType,
    /// The store failed.
    Store,
}

impl TopoError {
    /// The broad class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_)
            | Self::Catalog(CatalogError::Config(_)) => ErrorKind::Configuration,
            Self::Catalog(CatalogError::Field(_)) | Self::FieldType { .. } => ErrorKind::FieldType,
            Self::Catalog(CatalogError::Store(_)) | Self::Store { .. } => ErrorKind::Store,
            Self::MissingParent { .. }
            | Self::AmbiguousParent { .. }
            | Self::ParentTypeMismatch { .. }
            | Self::DuplicateInstance { .. }
            | Self::Orphan { .. }
            | Self::Cycle { .. }
            | Self::BusinessNotFound(_) => ErrorKind::DataIntegrity,
        }
    }
}
