mod context;
mod filter;
/// The store-backed mainline model catalog.
pub mod catalog;
/// An in-memory document store.
pub mod memory;
mod store;

pub use catalog::{CatalogError, ModelCatalog, StoreModelCatalog};
pub use context::RequestContext;
pub use filter::{Condition, Filter};
pub use memory::{MemoryStore, SnapshotError};
pub use store::{DocumentStore, StoreError};
