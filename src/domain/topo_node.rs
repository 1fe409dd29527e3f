use serde::{Deserialize, Serialize};

use crate::domain::{Config, Document, InstanceKey, ObjectId};

/// A node of the assembled instance tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoNode {
    /// The object type.
    #[serde(rename = "bk_obj_id")]
    pub object: ObjectId,

    /// The instance id.
    #[serde(rename = "bk_inst_id")]
    pub id: i64,

    /// The raw document. Empty unless detail was requested.
    #[serde(default)]
    pub detail: Document,

    /// Child nodes, in the order their records were loaded.
    #[serde(rename = "child", default)]
    pub children: Vec<Self>,
}

impl TopoNode {
    /// Creates a childless node.
    #[must_use]
    pub const fn new(object: ObjectId, id: i64, detail: Document) -> Self {
        Self {
            object,
            id,
            detail,
            children: Vec::new(),
        }
    }

    /// The identity key of this node.
    #[must_use]
    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.object.clone(), self.id)
    }

    /// The display name of the node.
    ///
    /// Read from the type-specific name field of the detail payload, falling
    /// back to `object:id` when detail is absent.
    #[must_use]
    pub fn name(&self, config: &Config) -> String {
        match self.detail.get(config.name_field(&self.object)) {
            Some(serde_json::Value::String(name)) => name.clone(),
            Some(value) if !value.is_null() => value.to_string(),
            _ => {
                tracing::trace!(node = %self.key(), "no display name in detail");
                self.key().to_string()
            }
        }
    }

    /// Finds the node with the given identity and returns the path to it.
    ///
    /// The path starts at the matching node and ends at `self`. It is empty
    /// if no such node exists below (or at) `self`.
    #[must_use]
    pub fn find_path(&self, object: &ObjectId, id: i64) -> Vec<&Self> {
        if self.object == *object && self.id == id {
            return vec![self];
        }
        for child in &self.children {
            let mut path = child.find_path(object, id);
            if !path.is_empty() {
                path.push(self);
                return path;
            }
        }
        Vec::new()
    }

    /// The path from a module up to `self`; see [`TopoNode::find_path`].
    #[must_use]
    pub fn find_module_path(&self, config: &Config, module_id: i64) -> Vec<&Self> {
        self.find_path(&config.objects.module, module_id)
    }

    /// Iterates the tree in pre-order, starting with `self`.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// The number of levels below `self`; zero for a leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(object: &str, id: i64, children: Vec<TopoNode>) -> TopoNode {
        TopoNode {
            children,
            ..TopoNode::new(ObjectId::try_from(object).unwrap(), id, Document::new())
        }
    }

    fn sample() -> TopoNode {
        node(
            "biz",
            5,
            vec![
                node("set", 10, vec![node("module", 100, vec![])]),
                node(
                    "set",
                    11,
                    vec![node("module", 101, vec![]), node("module", 102, vec![])],
                ),
            ],
        )
    }

    fn keys<'a>(nodes: impl IntoIterator<Item = &'a TopoNode>) -> Vec<String> {
        nodes.into_iter().map(|n| n.key().to_string()).collect()
    }

    #[test]
    fn iter_is_pre_order() {
        assert_eq!(
            keys(sample().iter()),
            ["biz:5", "set:10", "module:100", "set:11", "module:101", "module:102"]
        );
    }

    #[test]
    fn find_module_path_runs_leaf_to_root() {
        let config = Config::default();
        let tree = sample();

        assert_eq!(
            keys(tree.find_module_path(&config, 102)),
            ["module:102", "set:11", "biz:5"]
        );
        assert!(tree.find_module_path(&config, 999).is_empty());
    }

    #[test]
    fn find_path_distinguishes_object_types() {
        let tree = sample();
        let set = ObjectId::try_from("set").unwrap();

        assert_eq!(keys(tree.find_path(&set, 10)), ["set:10", "biz:5"]);
        assert!(tree.find_path(&set, 100).is_empty());
    }

    #[test]
    fn name_reads_type_specific_field() {
        let config = Config::default();
        let mut set = node("set", 10, vec![]);
        set.detail.insert("bk_set_name".to_string(), json!("idle pool"));
        let rack = node("rack", 3, vec![]);

        assert_eq!(set.name(&config), "idle pool");
        assert_eq!(rack.name(&config), "rack:3");
    }

    #[test]
    fn depth_counts_levels_below() {
        assert_eq!(sample().depth(), 2);
        assert_eq!(node("module", 1, vec![]).depth(), 0);
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(node("set", 10, vec![node("module", 100, vec![])])).unwrap();

        assert_eq!(
            value,
            json!({
                "bk_obj_id": "set",
                "bk_inst_id": 10,
                "detail": {},
                "child": [
                    {"bk_obj_id": "module", "bk_inst_id": 100, "detail": {}, "child": []}
                ]
            })
        );
    }
}
