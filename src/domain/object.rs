use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// An object type identifier, such as `biz`, `set`, `module` or a
/// deployment-defined custom level.
///
/// Identifiers are opaque, but never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(NonEmptyString);

impl ObjectId {
    /// Creates a new `ObjectId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidObjectIdError`] if the string is empty or consists
    /// only of whitespace.
    pub fn new(s: String) -> Result<Self, InvalidObjectIdError> {
        if s.trim().is_empty() {
            return Err(InvalidObjectIdError(s));
        }
        NonEmptyString::new(s)
            .map(Self)
            .map_err(InvalidObjectIdError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = InvalidObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ObjectId {
    type Error = InvalidObjectIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<ObjectId> for String {
    fn from(value: ObjectId) -> Self {
        value.0.as_str().to_owned()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for ObjectId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl PartialEq<str> for ObjectId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ObjectId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string is not a usable object type identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid object type '{0}': must be non-empty")]
pub struct InvalidObjectIdError(String);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("biz"; "builtin business")]
    #[test_case("set"; "builtin set")]
    #[test_case("idc_rack"; "custom level")]
    fn accepts_non_empty(s: &str) {
        let id = ObjectId::try_from(s).unwrap();
        assert_eq!(id.as_str(), s);
        assert_eq!(id.to_string(), s);
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "whitespace")]
    fn rejects_blank(s: &str) {
        assert!(ObjectId::try_from(s).is_err());
    }

    #[test]
    fn deserializes_from_plain_string() {
        let id: ObjectId = serde_json::from_str("\"module\"").unwrap();
        assert_eq!(id, "module");

        let error = serde_json::from_str::<ObjectId>("\"\"").unwrap_err();
        assert!(error.to_string().contains("must be non-empty"));
    }
}
