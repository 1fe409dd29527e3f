//! Rebuilds the mainline instance tree of one business.
//!
//! A build runs in three phases over a shared [`FlatInstanceIndex`]:
//!
//! 1. **load**: read the business, its sets, its modules and its custom-level
//!    instances, and normalise them into flat records in that order;
//! 2. **repair**: fetch any parent that is referenced but was not loaded;
//! 3. **assemble**: link records to their parents and materialise the tree
//!    under the business root.
//!
//! [`TopoService`] wraps the phases behind the two public queries.

use tracing::instrument;

use crate::{
    domain::{
        Config, FlatInstance, FlatInstanceIndex, InstanceKey, ModelSpineNode, ParentTypeMap,
        Spine, TopoNode,
    },
    storage::{DocumentStore, ModelCatalog, RequestContext, StoreError},
};

mod assembler;
mod error;
mod loader;
mod normalizer;
mod repair;

pub use error::{ErrorKind, TopoError};
use normalizer::InstanceKind;

/// Builds the instance tree of a single business.
///
/// Each builder serves one request and is discarded afterwards.
#[derive(Debug)]
pub struct InstanceMainline<'a, S> {
    store: &'a S,
    ctx: &'a RequestContext,
    config: &'a Config,
    business_id: i64,
    with_detail: bool,
    spine: Spine,
    parents: ParentTypeMap,
    index: FlatInstanceIndex,
}

impl<'a, S: DocumentStore> InstanceMainline<'a, S> {
    /// Creates a builder for `business_id` over a validated spine.
    #[must_use]
    pub fn new(
        store: &'a S,
        ctx: &'a RequestContext,
        config: &'a Config,
        spine: Spine,
        business_id: i64,
        with_detail: bool,
    ) -> Self {
        let parents = spine.parent_map();
        Self {
            store,
            ctx,
            config,
            business_id,
            with_detail,
            spine,
            parents,
            index: FlatInstanceIndex::default(),
        }
    }

    /// The identity of the business root.
    #[must_use]
    pub fn business_key(&self) -> InstanceKey {
        InstanceKey::new(self.config.objects.business.clone(), self.business_id)
    }

    /// The spine this builder follows.
    #[must_use]
    pub const fn spine(&self) -> &Spine {
        &self.spine
    }

    /// The flat records gathered so far, in arrival order.
    #[must_use]
    pub const fn index(&self) -> &FlatInstanceIndex {
        &self.index
    }

    /// Reads every instance of the business and indexes it.
    ///
    /// # Errors
    ///
    /// Fails if a read fails, a document has a malformed field, or two
    /// records share a key.
    pub fn load(&mut self) -> Result<(), TopoError> {
        let business = self.load_business()?;
        let sets = self.load_sets()?;
        let modules = self.load_modules()?;
        let custom = self.load_custom_levels()?;

        let root = self.business_instance(business);
        self.insert(root)?;

        let documents = sets
            .into_iter()
            .map(|document| (InstanceKind::Set, document))
            .chain(modules.into_iter().map(|document| (InstanceKind::Module, document)))
            .chain(custom.into_iter().map(|document| (InstanceKind::Custom, document)));
        for (kind, document) in documents {
            let instance = self.normalize(kind, document)?;
            self.insert(instance)?;
        }

        tracing::debug!(
            business = self.business_id,
            instances = self.index.len(),
            "indexed instances"
        );
        Ok(())
    }

    /// Runs every phase and returns the tree.
    ///
    /// # Errors
    ///
    /// Fails on the first error of any phase.
    pub fn build(mut self) -> Result<Option<TopoNode>, TopoError> {
        self.load()?;
        self.repair_gaps()?;
        self.assemble()
    }

    fn insert(&mut self, instance: FlatInstance) -> Result<usize, TopoError> {
        self.index
            .insert(instance)
            .map_err(|e| TopoError::DuplicateInstance {
                business: self.business_id,
                key: e.0,
            })
    }

    fn store_error(&self, collection: &str, source: StoreError) -> TopoError {
        tracing::error!(business = self.business_id, collection, %source, "store read failed");
        TopoError::Store {
            business: self.business_id,
            collection: collection.to_string(),
            source,
        }
    }
}

/// The mainline topology queries.
#[derive(Debug, Clone)]
pub struct TopoService<S, C> {
    store: S,
    catalog: C,
    config: Config,
}

impl<S: DocumentStore, C: ModelCatalog> TopoService<S, C> {
    /// Creates a service reading instances from `store` and the model from
    /// `catalog`.
    #[must_use]
    pub const fn new(store: S, catalog: C, config: Config) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// The field-name contracts in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the declared mainline model, passed through unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the model cannot be read.
    #[instrument(skip(self, ctx), fields(request = %ctx.request_id()))]
    pub fn search_mainline_model_topo(
        &self,
        ctx: &RequestContext,
        with_detail: bool,
    ) -> Result<ModelSpineNode, TopoError> {
        Ok(self.catalog.mainline_model(ctx, with_detail)?)
    }

    /// Rebuilds the instance tree of one business.
    ///
    /// Returns `None` when nothing hangs under the business.
    ///
    /// # Errors
    ///
    /// Fails if the model is unusable, a read fails, or the instance data is
    /// inconsistent. No partial tree is returned.
    #[instrument(skip(self, ctx), fields(request = %ctx.request_id()))]
    pub fn search_mainline_instance_topo(
        &self,
        ctx: &RequestContext,
        business_id: i64,
        with_detail: bool,
    ) -> Result<Option<TopoNode>, TopoError> {
        let model = self.catalog.mainline_model(ctx, false)?;
        let spine = Spine::resolve(&model);
        spine.validate(&self.config)?;
        tracing::debug!(levels = spine.len(), "resolved mainline spine");

        let builder = InstanceMainline::new(
            &self.store,
            ctx,
            &self.config,
            spine,
            business_id,
            with_detail,
        );
        let root = builder.build()?;

        tracing::info!(
            nodes = root.as_ref().map_or(0, |root| root.iter().count()),
            "built mainline topology"
        );
        Ok(root)
    }
}
