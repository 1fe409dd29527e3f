//! Domain models for mainline topology.
//!
//! This module contains the core domain types: object type identifiers, the
//! mainline model spine, flat instance records, the assembled instance tree
//! and the field-name configuration.

/// A raw key/value document as returned by the document store.
pub type Document = serde_json::Map<String, serde_json::Value>;

mod config;
pub use config::Config;

mod error;
pub use error::{ConfigError, FieldError};

pub mod field;

/// Object type identifiers.
pub mod object;
pub use object::ObjectId;

/// The mainline model schema and its linearised spine.
pub mod spine;
pub use spine::{ModelSpineNode, ParentTypeMap, Spine};

mod instance;
pub use instance::{DuplicateInstanceError, FlatInstance, FlatInstanceIndex, InstanceKey};

mod topo_node;
pub use topo_node::TopoNode;
