use serde_json::Value;

use crate::domain::{
    Document,
    field::{as_i64, lookup},
};

/// A single predicate on a document field.
///
/// Field paths may be dotted to reach into embedded documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field equals the value.
    Eq {
        /// Dotted field path.
        path: String,
        /// The value to compare against.
        value: Value,
    },
    /// The field equals one of the values.
    In {
        /// Dotted field path.
        path: String,
        /// The accepted values.
        values: Vec<Value>,
    },
}

impl Condition {
    /// The field path this condition reads.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Eq { path, .. } | Self::In { path, .. } => path,
        }
    }

    fn matches(&self, document: &Document) -> bool {
        let Some(field) = lookup(document, self.path()) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => values_equal(field, value),
            Self::In { values, .. } => values.iter().any(|value| values_equal(field, value)),
        }
    }
}

/// A conjunction of conditions.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// A filter that matches everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn equal(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a membership condition.
    #[must_use]
    pub fn any_of<V: Into<Value>>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The conditions, in the order they were added.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns `true` if the document satisfies every condition.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Numbers compare by value, so `5` matches `5.0`. Strings never match
/// numbers.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => match (as_i64(left), as_i64(right)) {
            (Some(l), Some(r)) => l == r,
            _ => left == right,
        },
        _ => left == right,
    }
}
