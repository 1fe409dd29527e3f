// Converts raw documents into flat instances.

use crate::{
    domain::{
        Document, FieldError, FlatInstance,
        field::{require_i64, require_object},
    },
    mainline::{InstanceMainline, TopoError},
    storage::DocumentStore,
};

/// Which collection a document was read from.
///
/// Each collection stores the instance id under a different field, and only
/// sets and modules carry the default flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InstanceKind {
    Set,
    Module,
    Custom,
}

impl<S: DocumentStore> InstanceMainline<'_, S> {
    /// The business root. It has no parent, and carries the business record
    /// as detail when one was loaded.
    pub(super) fn business_instance(&self, record: Option<Document>) -> FlatInstance {
        FlatInstance {
            object: self.config.objects.business.clone(),
            id: self.business_id,
            parent_id: 0,
            default_flag: 0,
            detail: record.unwrap_or_default(),
        }
    }

    pub(super) fn normalize(
        &self,
        kind: InstanceKind,
        document: Document,
    ) -> Result<FlatInstance, TopoError> {
        self.try_normalize(kind, document)
            .map_err(|source| TopoError::FieldType {
                business: self.business_id,
                source,
            })
    }

    fn try_normalize(
        &self,
        kind: InstanceKind,
        document: Document,
    ) -> Result<FlatInstance, FieldError> {
        let objects = &self.config.objects;
        let fields = &self.config.fields;

        let (object, id_field) = match kind {
            InstanceKind::Set => (objects.set.clone(), &fields.set_id),
            InstanceKind::Module => (objects.module.clone(), &fields.module_id),
            InstanceKind::Custom => (
                require_object(&document, "instance", &fields.object_id)?,
                &fields.instance_id,
            ),
        };

        let id = require_i64(&document, &object, id_field)?;
        let parent_id = require_i64(&document, &object, &fields.parent_id)?;
        let default_flag = match kind {
            InstanceKind::Set | InstanceKind::Module => {
                require_i64(&document, &object, &fields.default_flag)?
            }
            InstanceKind::Custom => 0,
        };

        Ok(FlatInstance {
            object,
            id,
            parent_id,
            default_flag,
            detail: if self.with_detail {
                document
            } else {
                Document::new()
            },
        })
    }
}
