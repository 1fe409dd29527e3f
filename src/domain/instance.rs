// Flat topology records and their index.
//
// These are the intermediate form between raw store documents and the
// assembled `TopoNode` tree.

use std::{collections::HashMap, fmt};

use crate::domain::{Config, Document, ObjectId};

/// The identity of an instance: its object type and instance id.
///
/// Instance ids are only unique per object type, so both parts are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceKey {
    /// The object type.
    pub object: ObjectId,
    /// The instance id.
    pub id: i64,
}

impl InstanceKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(object: ObjectId, id: i64) -> Self {
        Self { object, id }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.object, self.id)
    }
}

/// One topology node before tree assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatInstance {
    /// The object type.
    pub object: ObjectId,
    /// The instance id.
    pub id: i64,
    /// The parent instance id. Zero only for the business root.
    pub parent_id: i64,
    /// The "default" flag of sets and modules.
    ///
    /// `0` is an ordinary container, `1` the idle pool. Other object types
    /// always carry `0`.
    pub default_flag: i64,
    /// The raw document, populated only when detail was requested.
    pub detail: Document,
}

impl FlatInstance {
    /// The identity key of this instance.
    #[must_use]
    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.object.clone(), self.id)
    }

    /// Returns `true` for the idle-pool set, which always hangs directly off
    /// the business regardless of custom levels.
    #[must_use]
    pub fn is_idle_pool(&self, config: &Config) -> bool {
        self.object == config.objects.set && self.default_flag == 1
    }
}

/// An instance key was inserted twice.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("instance {0} appears more than once")]
pub struct DuplicateInstanceError(pub InstanceKey);

/// Flat instances indexed by identity, in arrival order.
///
/// Arrival order is preserved because it decides sibling order in the
/// assembled tree. The index only grows; records are never removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlatInstanceIndex {
    /// The instances, stored contiguously in arrival order.
    instances: Vec<FlatInstance>,

    /// An index from identity key to position in `instances`.
    positions: HashMap<InstanceKey, usize>,
}

impl FlatInstanceIndex {
    /// Creates an index with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Appends an instance and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateInstanceError`] if an instance with the same key is
    /// already present. The index is left unchanged.
    pub fn insert(&mut self, instance: FlatInstance) -> Result<usize, DuplicateInstanceError> {
        let key = instance.key();
        if self.positions.contains_key(&key) {
            return Err(DuplicateInstanceError(key));
        }
        let position = self.instances.len();
        self.instances.push(instance);
        self.positions.insert(key, position);
        Ok(position)
    }

    /// Looks up an instance by key.
    #[must_use]
    pub fn get(&self, key: &InstanceKey) -> Option<&FlatInstance> {
        self.position(key).and_then(|idx| self.instances.get(idx))
    }

    /// The arrival position of an instance.
    #[must_use]
    pub fn position(&self, key: &InstanceKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// The instance at an arrival position.
    #[must_use]
    pub fn at(&self, position: usize) -> Option<&FlatInstance> {
        self.instances.get(position)
    }

    /// Returns `true` if an instance with this key is present.
    #[must_use]
    pub fn contains(&self, key: &InstanceKey) -> bool {
        self.positions.contains_key(key)
    }

    /// The number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterates instances in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatInstance> {
        self.instances.iter()
    }

    /// Consumes the index, returning instances in arrival order.
    #[must_use]
    pub fn into_instances(self) -> Vec<FlatInstance> {
        self.instances
    }
}

impl std::ops::Index<usize> for FlatInstanceIndex {
    type Output = FlatInstance;

    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    fn index(&self, position: usize) -> &FlatInstance {
        &self.instances[position]
    }
}
