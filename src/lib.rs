//! Mainline topology reconstruction
//!
//! Business topology (business, custom levels, sets, modules) is stored as
//! flat documents. This crate rebuilds a single rooted tree from them for one
//! business at a time.

pub mod domain;
pub use domain::{
    Config, ConfigError, Document, FieldError, FlatInstance, FlatInstanceIndex, InstanceKey,
    ModelSpineNode, ObjectId, ParentTypeMap, Spine, TopoNode,
};

/// Document store access and the mainline model catalog.
pub mod storage;
pub use storage::{
    DocumentStore, Filter, MemoryStore, ModelCatalog, RequestContext, StoreError,
    StoreModelCatalog,
};

pub mod mainline;
pub use mainline::{ErrorKind, InstanceMainline, TopoError, TopoService};
