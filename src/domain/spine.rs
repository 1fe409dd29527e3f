use std::collections::HashMap;

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::domain::{Config, ConfigError, Document, ObjectId};

/// One node of the declared mainline model.
///
/// The mainline model is expected to be a single chain from business to
/// module. Nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpineNode {
    /// The object type at this level.
    #[serde(rename = "bk_obj_id")]
    pub object: ObjectId,

    /// The model description document, populated only on request.
    #[serde(default, skip_serializing_if = "Document::is_empty")]
    pub detail: Document,

    /// Child levels, in declared order.
    #[serde(rename = "child", default)]
    pub children: Vec<Self>,
}

impl ModelSpineNode {
    /// Creates a childless node without detail.
    #[must_use]
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            detail: Document::new(),
            children: Vec::new(),
        }
    }

    /// Builds a linear chain of nodes, one per object type, in order.
    #[must_use]
    pub fn chain(objects: NonEmpty<ObjectId>) -> Self {
        let leaf = Self::new(objects.last().clone());
        let upper: Vec<ObjectId> = objects.into_iter().collect();
        upper[..upper.len() - 1]
            .iter()
            .rev()
            .fold(leaf, |child, object| Self {
                children: vec![child],
                ..Self::new(object.clone())
            })
    }
}

/// The mainline model linearised into an ordered list of object types.
///
/// The first element is the business type and the last is the module type,
/// provided the model is well formed (see [`Spine::validate`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spine(NonEmpty<ObjectId>);

impl Spine {
    /// Linearises a model tree by always descending into the first child.
    ///
    /// Siblings beyond the first are ignored. A root without children yields a
    /// single-level spine.
    #[must_use]
    pub fn resolve(root: &ModelSpineNode) -> Self {
        let mut objects = NonEmpty::new(root.object.clone());
        let mut node = root;
        while let Some(child) = node.children.first() {
            objects.push(child.object.clone());
            node = child;
        }
        Self(objects)
    }

    /// Checks that the spine runs from the business type to the module type.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the spine has a single level, or does not
    /// start and end at the configured business and module types.
    pub fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        let first = self.first();
        let last = self.last();

        if *first != config.objects.business {
            return Err(ConfigError::UnexpectedRoot {
                expected: config.objects.business.clone(),
                found: first.clone(),
            });
        }
        if self.len() < 2 {
            return Err(ConfigError::SpineTooShort {
                root: first.clone(),
            });
        }
        if *last != config.objects.module {
            return Err(ConfigError::UnexpectedLeaf {
                expected: config.objects.module.clone(),
                found: last.clone(),
            });
        }
        Ok(())
    }

    /// The top of the spine.
    #[must_use]
    pub fn first(&self) -> &ObjectId {
        self.0.first()
    }

    /// The bottom of the spine.
    #[must_use]
    pub fn last(&self) -> &ObjectId {
        self.0.last()
    }

    /// The number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a spine has at least one level.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates object types from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.0.iter()
    }

    /// Returns `true` if the object type is a level of the spine.
    #[must_use]
    pub fn contains(&self, object: &ObjectId) -> bool {
        self.0.iter().any(|o| o == object)
    }

    /// The deployment-defined levels: everything except the built-in
    /// business, set and module types.
    pub fn custom_levels<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a ObjectId> {
        self.iter().filter(|object| !config.is_builtin(object))
    }

    /// Pairs consecutive levels into a child to parent map.
    #[must_use]
    pub fn parent_map(&self) -> ParentTypeMap {
        let levels: Vec<&ObjectId> = self.iter().collect();
        ParentTypeMap(
            levels
                .windows(2)
                .map(|pair| (pair[1].clone(), pair[0].clone()))
                .collect(),
        )
    }
}

impl From<Spine> for Vec<ObjectId> {
    fn from(spine: Spine) -> Self {
        spine.0.into()
    }
}

/// Maps each object type to the type immediately above it in the spine.
///
/// Every spine level except the first has an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentTypeMap(HashMap<ObjectId, ObjectId>);

impl ParentTypeMap {
    /// The parent type of the given object type, if it has one.
    #[must_use]
    pub fn parent_of(&self, object: &ObjectId) -> Option<&ObjectId> {
        self.0.get(object)
    }

    /// The number of mapped object types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a single-level spine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn object(s: &str) -> ObjectId {
        ObjectId::try_from(s).unwrap()
    }

    fn chain(levels: &[&str]) -> ModelSpineNode {
        let objects = NonEmpty::from_vec(levels.iter().map(|s| object(s)).collect()).unwrap();
        ModelSpineNode::chain(objects)
    }

    fn names(spine: &Spine) -> Vec<&str> {
        spine.iter().map(ObjectId::as_str).collect()
    }

    #[test_case(&["biz", "set", "module"]; "no custom levels")]
    #[test_case(&["biz", "city", "set", "module"]; "one custom level")]
    #[test_case(&["biz", "region", "city", "rack", "set", "module"]; "three custom levels")]
    fn resolves_linear_chain(levels: &[&str]) {
        let spine = Spine::resolve(&chain(levels));

        assert_eq!(names(&spine), levels);
        assert!(spine.validate(&Config::default()).is_ok());
    }

    #[test]
    fn follows_first_child_only() {
        let mut root = chain(&["biz", "set", "module"]);
        root.children.push(chain(&["zone", "module"]));

        let spine = Spine::resolve(&root);
        assert_eq!(names(&spine), ["biz", "set", "module"]);
    }

    #[test]
    fn childless_root_is_single_level() {
        let spine = Spine::resolve(&ModelSpineNode::new(object("biz")));

        assert_eq!(spine.len(), 1);
        assert!(spine.parent_map().is_empty());
        assert_eq!(
            spine.validate(&Config::default()),
            Err(ConfigError::SpineTooShort {
                root: object("biz")
            })
        );
    }

    #[test]
    fn rejects_spine_not_rooted_at_business() {
        let spine = Spine::resolve(&chain(&["host", "set", "module"]));

        assert!(matches!(
            spine.validate(&Config::default()),
            Err(ConfigError::UnexpectedRoot { .. })
        ));
    }

    #[test]
    fn rejects_spine_not_ending_at_module() {
        let spine = Spine::resolve(&chain(&["biz", "set"]));

        assert!(matches!(
            spine.validate(&Config::default()),
            Err(ConfigError::UnexpectedLeaf { .. })
        ));
    }

    #[test]
    fn parent_map_pairs_consecutive_levels() {
        let spine = Spine::resolve(&chain(&["biz", "city", "set", "module"]));
        let parents = spine.parent_map();

        assert_eq!(parents.len(), 3);
        assert_eq!(parents.parent_of(&object("city")), Some(&object("biz")));
        assert_eq!(parents.parent_of(&object("set")), Some(&object("city")));
        assert_eq!(parents.parent_of(&object("module")), Some(&object("set")));
        assert_eq!(parents.parent_of(&object("biz")), None);
    }

    #[test]
    fn custom_levels_exclude_builtins() {
        let config = Config::default();
        let spine = Spine::resolve(&chain(&["biz", "region", "city", "set", "module"]));

        let custom: Vec<&str> = spine.custom_levels(&config).map(ObjectId::as_str).collect();
        assert_eq!(custom, ["region", "city"]);
    }
}
