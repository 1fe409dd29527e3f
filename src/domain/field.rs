//! Typed field access on raw documents.
//!
//! Stores return loosely typed documents: integer ids may arrive as JSON
//! integers, as integral floats, or as decimal strings. These helpers accept
//! all three and reject anything else with a [`FieldError`] that names the
//! object type, the field and the raw value.

use serde_json::Value;

use crate::domain::{Document, FieldError, ObjectId};

/// Resolves a dotted path such as `metadata.label.bk_biz_id`.
#[must_use]
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(document.get(first)?, |value, segment| value.get(segment))
}

/// Reads a required 64-bit integer field.
///
/// # Errors
///
/// Returns [`FieldError::Missing`] if the field is absent or null, and
/// [`FieldError::NotInteger`] if it cannot be read as an `i64`.
pub fn require_i64(document: &Document, object: &str, field: &str) -> Result<i64, FieldError> {
    match lookup(document, field) {
        None | Some(Value::Null) => Err(FieldError::Missing {
            object: object.to_string(),
            field: field.to_string(),
        }),
        Some(value) => as_i64(value).ok_or_else(|| FieldError::NotInteger {
            object: object.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Reads a required object type field.
///
/// # Errors
///
/// Returns [`FieldError::Missing`] if the field is absent, and
/// [`FieldError::NotObjectType`] if it is not a non-empty string.
pub fn require_object(
    document: &Document,
    object: &str,
    field: &str,
) -> Result<ObjectId, FieldError> {
    match lookup(document, field) {
        None | Some(Value::Null) => Err(FieldError::Missing {
            object: object.to_string(),
            field: field.to_string(),
        }),
        Some(value) => value
            .as_str()
            .and_then(|s| ObjectId::try_from(s).ok())
            .ok_or_else(|| FieldError::NotObjectType {
                object: object.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

/// Converts a JSON value to `i64` if it represents one exactly.
#[must_use]
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| integral(number.as_f64()?)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn integral(float: f64) -> Option<i64> {
    let int = float as i64;
    (float.fract() == 0.0 && int as f64 == float).then_some(int)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn document(value: &Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test_case(json!(42), Some(42); "integer")]
    #[test_case(json!(-7), Some(-7); "negative integer")]
    #[test_case(json!(42.0), Some(42); "integral float")]
    #[test_case(json!(42.5), None; "fractional float")]
    #[test_case(json!("42"), Some(42); "decimal string")]
    #[test_case(json!(" 42 "), Some(42); "padded string")]
    #[test_case(json!("forty-two"), None; "word")]
    #[test_case(json!(true), None; "boolean")]
    #[test_case(json!([1]), None; "array")]
    fn converts_integers(value: Value, expected: Option<i64>) {
        assert_eq!(as_i64(&value), expected);
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let doc = document(&json!({"metadata": {"label": {"bk_biz_id": "3"}}}));

        assert_eq!(
            lookup(&doc, "metadata.label.bk_biz_id"),
            Some(&json!("3"))
        );
        assert_eq!(lookup(&doc, "metadata.label.missing"), None);
        assert_eq!(lookup(&doc, "metadata.label.bk_biz_id.deeper"), None);
    }

    #[test]
    fn require_i64_names_object_field_and_value() {
        let doc = document(&json!({"bk_parent_id": "north"}));

        let error = require_i64(&doc, "set", "bk_parent_id").unwrap_err();
        assert_eq!(
            error,
            FieldError::NotInteger {
                object: "set".to_string(),
                field: "bk_parent_id".to_string(),
                value: "\"north\"".to_string(),
            }
        );
        assert!(error.to_string().contains("\"north\""));
    }

    #[test]
    fn null_counts_as_missing() {
        let doc = document(&json!({"bk_set_id": null}));

        assert!(matches!(
            require_i64(&doc, "set", "bk_set_id"),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn require_object_rejects_non_strings() {
        let doc = document(&json!({"bk_obj_id": 12}));

        assert!(matches!(
            require_object(&doc, "instance", "bk_obj_id"),
            Err(FieldError::NotObjectType { .. })
        ));
    }
}
