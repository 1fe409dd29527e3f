// Store reads for one business.
//
// Each loader issues exactly one query. Results come back in store order,
// which becomes sibling order in the assembled tree.

use crate::{
    domain::{Document, ObjectId},
    mainline::{InstanceMainline, TopoError},
    storage::{DocumentStore, Filter},
};

impl<S: DocumentStore> InstanceMainline<'_, S> {
    /// Reads the business record. Only needed when detail was requested.
    pub(super) fn load_business(&self) -> Result<Option<Document>, TopoError> {
        if !self.with_detail {
            return Ok(None);
        }

        let collection = &self.config.collections.business;
        let filter =
            Filter::new().equal(self.config.fields.business_id.as_str(), self.business_id);
        match self.store.find_one(self.ctx, collection, &filter) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(business = self.business_id, "business record not found");
                Err(TopoError::BusinessNotFound(self.business_id))
            }
            Err(source) => Err(self.store_error(collection, source)),
        }
    }

    pub(super) fn load_sets(&self) -> Result<Vec<Document>, TopoError> {
        self.load_by_business(&self.config.collections.set)
    }

    pub(super) fn load_modules(&self) -> Result<Vec<Document>, TopoError> {
        self.load_by_business(&self.config.collections.module)
    }

    /// Reads generic instances labelled with this business whose type is one
    /// of the custom spine levels.
    ///
    /// The label holds the business id as a string.
    pub(super) fn load_custom_levels(&self) -> Result<Vec<Document>, TopoError> {
        let levels: Vec<&str> = self
            .spine
            .custom_levels(self.config)
            .map(ObjectId::as_str)
            .collect();
        if levels.is_empty() {
            tracing::debug!(business = self.business_id, "no custom levels to load");
            return Ok(Vec::new());
        }

        let fields = &self.config.fields;
        let collection = &self.config.collections.instance;
        let filter = Filter::new()
            .equal(fields.business_label.as_str(), self.business_id.to_string())
            .any_of(fields.object_id.as_str(), levels);
        let documents = self
            .store
            .find(self.ctx, collection, &filter)
            .map_err(|source| self.store_error(collection, source))?;

        tracing::debug!(
            business = self.business_id,
            collection = collection.as_str(),
            documents = documents.len(),
            "loaded custom level instances"
        );
        Ok(documents)
    }

    fn load_by_business(&self, collection: &str) -> Result<Vec<Document>, TopoError> {
        let filter =
            Filter::new().equal(self.config.fields.business_id.as_str(), self.business_id);
        let documents = self
            .store
            .find(self.ctx, collection, &filter)
            .map_err(|source| self.store_error(collection, source))?;

        tracing::debug!(
            business = self.business_id,
            collection,
            documents = documents.len(),
            "loaded instances"
        );
        Ok(documents)
    }
}
