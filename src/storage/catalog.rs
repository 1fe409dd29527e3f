//! The mainline model catalog.
//!
//! The mainline model is declared as a set of association records, each
//! linking a child object type to its parent with the mainline association
//! kind. [`StoreModelCatalog`] turns those records back into a
//! [`ModelSpineNode`] tree rooted at the business type.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::{
    domain::{
        Config, ConfigError, Document, FieldError, ModelSpineNode, ObjectId, field::require_object,
    },
    storage::{DocumentStore, Filter, RequestContext, StoreError},
};

/// Errors that can occur when reading the mainline model.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The association records do not describe a usable model.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An association record is missing a field.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A source of the mainline model for the current deployment.
pub trait ModelCatalog {
    /// Returns the full mainline model tree.
    ///
    /// When `with_detail` is set, each node carries its model description.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the model cannot be read.
    fn mainline_model(
        &self,
        ctx: &RequestContext,
        with_detail: bool,
    ) -> Result<ModelSpineNode, CatalogError>;
}

/// A fixed model, for deployments whose schema never changes.
impl ModelCatalog for ModelSpineNode {
    fn mainline_model(
        &self,
        _ctx: &RequestContext,
        _with_detail: bool,
    ) -> Result<ModelSpineNode, CatalogError> {
        Ok(self.clone())
    }
}

/// Reads the mainline model from association records in a document store.
#[derive(Debug, Clone)]
pub struct StoreModelCatalog<S> {
    store: S,
    config: Config,
}

impl<S: DocumentStore> StoreModelCatalog<S> {
    /// Creates a catalog over the given store.
    pub const fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    fn child_types(
        &self,
        ctx: &RequestContext,
    ) -> Result<HashMap<ObjectId, Vec<ObjectId>>, CatalogError> {
        let fields = &self.config.fields;
        let filter = Filter::new().equal(
            fields.association_kind.as_str(),
            fields.mainline_association.as_str(),
        );
        let records = self
            .store
            .find(ctx, &self.config.collections.association, &filter)?;
        tracing::debug!(associations = records.len(), "loaded mainline associations");

        let mut children: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        for record in &records {
            let child = require_object(record, "association", &fields.object_id)?;
            let parent = require_object(record, "association", &fields.association_parent)?;
            children.entry(parent).or_default().push(child);
        }
        Ok(children)
    }

    fn describe(&self, ctx: &RequestContext, object: &ObjectId) -> Result<Document, StoreError> {
        let filter = Filter::new().equal(self.config.fields.object_id.as_str(), object.as_str());
        match self
            .store
            .find_one(ctx, &self.config.collections.model, &filter)
        {
            Ok(document) => Ok(document),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%object, "no model description");
                Ok(Document::new())
            }
            Err(e) => Err(e),
        }
    }

    fn build(
        &self,
        ctx: &RequestContext,
        object: ObjectId,
        children: &HashMap<ObjectId, Vec<ObjectId>>,
        ancestors: &mut HashSet<ObjectId>,
        with_detail: bool,
    ) -> Result<ModelSpineNode, CatalogError> {
        if !ancestors.insert(object.clone()) {
            return Err(ConfigError::CyclicModel(object).into());
        }

        let mut node = ModelSpineNode::new(object);
        if with_detail {
            node.detail = self.describe(ctx, &node.object)?;
        }
        for child in children.get(&node.object).into_iter().flatten() {
            let child = self.build(ctx, child.clone(), children, ancestors, with_detail)?;
            node.children.push(child);
        }
        ancestors.remove(&node.object);
        Ok(node)
    }
}

impl<S: DocumentStore> ModelCatalog for StoreModelCatalog<S> {
    #[instrument(skip(self, ctx), fields(request = %ctx.request_id()))]
    fn mainline_model(
        &self,
        ctx: &RequestContext,
        with_detail: bool,
    ) -> Result<ModelSpineNode, CatalogError> {
        let children = self.child_types(ctx)?;
        let root = self.config.objects.business.clone();
        self.build(ctx, root, &children, &mut HashSet::new(), with_detail)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Spine, storage::MemoryStore};

    fn document(value: &serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn association(child: &str, parent: &str) -> Document {
        document(&json!({
            "bk_obj_id": child,
            "bk_asst_obj_id": parent,
            "bk_asst_id": "bk_mainline",
        }))
    }

    fn catalog(store: MemoryStore) -> StoreModelCatalog<MemoryStore> {
        StoreModelCatalog::new(store, Config::default())
    }

    #[test]
    fn builds_chain_from_associations() {
        let mut store = MemoryStore::new();
        store.extend(
            "cc_ObjAsst",
            [
                association("module", "set"),
                association("city", "biz"),
                association("set", "city"),
                document(&json!({
                    "bk_obj_id": "host",
                    "bk_asst_obj_id": "module",
                    "bk_asst_id": "run",
                })),
            ],
        );

        let model = catalog(store)
            .mainline_model(&RequestContext::new(), false)
            .unwrap();

        let spine: Vec<ObjectId> = Spine::resolve(&model).into();
        assert_eq!(spine, ["biz", "city", "set", "module"]);
        assert!(model.detail.is_empty());
    }

    #[test]
    fn with_detail_attaches_model_descriptions() {
        let mut store = MemoryStore::new();
        store.extend(
            "cc_ObjAsst",
            [association("set", "biz"), association("module", "set")],
        );
        store.insert(
            "cc_ObjDes",
            document(&json!({"bk_obj_id": "set", "bk_obj_name": "Set"})),
        );

        let model = catalog(store)
            .mainline_model(&RequestContext::new(), true)
            .unwrap();

        assert!(model.detail.is_empty());
        assert_eq!(model.children[0].detail["bk_obj_name"], json!("Set"));
    }

    #[test]
    fn no_associations_yields_business_only() {
        let model = catalog(MemoryStore::new())
            .mainline_model(&RequestContext::new(), false)
            .unwrap();

        assert_eq!(model.object, "biz");
        assert!(model.children.is_empty());
    }

    #[test]
    fn rejects_cyclic_associations() {
        let mut store = MemoryStore::new();
        store.extend(
            "cc_ObjAsst",
            [association("set", "biz"), association("biz", "set")],
        );

        let error = catalog(store)
            .mainline_model(&RequestContext::new(), false)
            .unwrap_err();

        assert!(matches!(
            error,
            CatalogError::Config(ConfigError::CyclicModel(ref object)) if *object == "biz"
        ));
    }

    #[test]
    fn association_without_parent_is_a_field_error() {
        let mut store = MemoryStore::new();
        store.insert(
            "cc_ObjAsst",
            document(&json!({"bk_obj_id": "set", "bk_asst_id": "bk_mainline"})),
        );

        let error = catalog(store)
            .mainline_model(&RequestContext::new(), false)
            .unwrap_err();

        assert!(matches!(error, CatalogError::Field(FieldError::Missing { .. })));
    }
}
