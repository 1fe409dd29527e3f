// Gap repair.
//
// Custom-level instances created before a business was labelled are not
// returned by the business-scoped loaders. Their children still point at
// them, so every dangling parent reference is looked up once more in the
// generic collection, by instance id alone.

use std::collections::VecDeque;

use crate::{
    domain::{ConfigError, InstanceKey},
    mainline::{InstanceMainline, TopoError, normalizer::InstanceKind},
    storage::{DocumentStore, Filter},
};

impl<S: DocumentStore> InstanceMainline<'_, S> {
    /// The key the instance at `position` must hang under, or `None` for the
    /// business root.
    ///
    /// The idle-pool set always hangs under the business. Every other
    /// instance hangs under the spine level above its own type.
    pub(super) fn expected_parent_key(
        &self,
        position: usize,
    ) -> Result<Option<InstanceKey>, TopoError> {
        let instance = &self.index[position];

        if instance.parent_id == 0 {
            let key = instance.key();
            return if key == self.business_key() {
                Ok(None)
            } else {
                Err(TopoError::Orphan {
                    business: self.business_id,
                    key,
                })
            };
        }

        if instance.is_idle_pool(self.config) {
            return Ok(Some(self.business_key()));
        }

        let parent_object = self
            .parents
            .parent_of(&instance.object)
            .ok_or_else(|| ConfigError::UnknownObjectType(instance.object.clone()))?;
        Ok(Some(InstanceKey::new(
            parent_object.clone(),
            instance.parent_id,
        )))
    }

    /// Returns the position of `parent`, fetching it from the generic
    /// collection if it has not been loaded yet.
    ///
    /// A fetched parent is appended to the index, so it is fetched at most
    /// once per build.
    pub(super) fn resolve_or_repair(
        &mut self,
        child_position: usize,
        parent: &InstanceKey,
    ) -> Result<usize, TopoError> {
        if let Some(position) = self.index.position(parent) {
            return Ok(position);
        }

        let child = self.index[child_position].key();
        tracing::warn!(
            business = self.business_id,
            %child,
            %parent,
            "parent was not loaded, looking it up"
        );

        let collection = &self.config.collections.instance;
        let filter = Filter::new().equal(self.config.fields.instance_id.as_str(), parent.id);
        let mut matches = self
            .store
            .find(self.ctx, collection, &filter)
            .map_err(|source| self.store_error(collection, source))?;

        let document = match matches.len() {
            0 => {
                tracing::error!(business = self.business_id, %child, %parent, "parent does not exist");
                return Err(TopoError::MissingParent {
                    business: self.business_id,
                    child,
                    parent: parent.clone(),
                });
            }
            1 => matches.swap_remove(0),
            count => {
                tracing::error!(
                    business = self.business_id,
                    %child,
                    parent_id = parent.id,
                    count,
                    "parent id is ambiguous"
                );
                return Err(TopoError::AmbiguousParent {
                    business: self.business_id,
                    child,
                    parent_id: parent.id,
                    matches: count,
                });
            }
        };

        let instance = self.normalize(InstanceKind::Custom, document)?;
        if instance.object != parent.object {
            return Err(TopoError::ParentTypeMismatch {
                business: self.business_id,
                child,
                expected: parent.clone(),
                found: instance.key(),
            });
        }

        let position = self.insert(instance)?;
        tracing::debug!(business = self.business_id, %parent, "repaired missing parent");
        Ok(position)
    }

    /// Fetches every parent that is referenced but was not loaded.
    ///
    /// Repaired instances are queued too, so their own missing ancestors are
    /// repaired in the same pass. Returns the number of instances added.
    ///
    /// # Errors
    ///
    /// Fails on the first parent that cannot be repaired.
    pub fn repair_gaps(&mut self) -> Result<usize, TopoError> {
        let mut queue: VecDeque<usize> = (0..self.index.len()).collect();
        let mut repaired = 0;

        while let Some(position) = queue.pop_front() {
            let Some(parent) = self.expected_parent_key(position)? else {
                continue;
            };
            if self.index.contains(&parent) {
                continue;
            }
            let parent_position = self.resolve_or_repair(position, &parent)?;
            queue.push_back(parent_position);
            repaired += 1;
        }

        if repaired > 0 {
            tracing::info!(business = self.business_id, repaired, "repaired topology gaps");
        }
        Ok(repaired)
    }
}
