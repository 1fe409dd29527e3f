use crate::domain::ObjectId;

/// The mainline schema cannot produce a usable spine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The spine has fewer than two levels.
    #[error("mainline model rooted at '{root}' has no levels below the business")]
    SpineTooShort {
        /// The only object type in the spine.
        root: ObjectId,
    },

    /// The spine does not start at the configured business type.
    #[error("mainline model starts at '{found}', expected business type '{expected}'")]
    UnexpectedRoot {
        /// The configured business object type.
        expected: ObjectId,
        /// The object type the spine actually starts at.
        found: ObjectId,
    },

    /// The spine does not end at the configured module type.
    #[error("mainline model ends at '{found}', expected module type '{expected}'")]
    UnexpectedLeaf {
        /// The configured module object type.
        expected: ObjectId,
        /// The object type the spine actually ends at.
        found: ObjectId,
    },

    /// An instance has an object type the spine does not declare.
    #[error("object type '{0}' is not part of the mainline model")]
    UnknownObjectType(ObjectId),

    /// The mainline associations loop back onto an object type.
    #[error("mainline model is cyclic at object type '{0}'")]
    CyclicModel(ObjectId),

    /// A model record names an unusable object type.
    #[error("mainline model contains an invalid object type: '{0}'")]
    InvalidObjectType(String),
}

/// A required field is absent or cannot be converted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    /// The field is not present on the document.
    #[error("{object} document has no field '{field}'")]
    Missing {
        /// The object type of the offending document.
        object: String,
        /// The field that was read.
        field: String,
    },

    /// The field is present but is not a 64-bit integer.
    #[error("{object} field '{field}' has value {value}, which is not a 64-bit integer")]
    NotInteger {
        /// The object type of the offending document.
        object: String,
        /// The field that was read.
        field: String,
        /// The raw value, rendered as JSON.
        value: String,
    },

    /// The field is present but is not a usable object type.
    #[error("{object} field '{field}' has value {value}, which is not an object type")]
    NotObjectType {
        /// The object type of the offending document.
        object: String,
        /// The field that was read.
        field: String,
        /// The raw value, rendered as JSON.
        value: String,
    },
}
