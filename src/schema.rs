//! Shallow schema extraction
//!
//! Describes the top-level fields of one representative record: the document
//! itself when it is an object, or the first element when it is an array.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One top-level field and the runtime category of its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in the document
    pub field: String,
    /// Category name (`integer`, `float`, `string`, `mapping`, `sequence`, `boolean`, `null`)
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldDescriptor {
    pub fn new(field: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: field_type.into(),
        }
    }
}

/// Ordered field list derived from one record
pub type SchemaDescriptor = Vec<FieldDescriptor>;

/// Returns the category name used in schema descriptors for a JSON value
///
/// # Examples
///
/// ```
/// use schemabridge::schema::type_name;
/// use serde_json::json;
///
/// assert_eq!(type_name(&json!(1)), "integer");
/// assert_eq!(type_name(&json!(1.5)), "float");
/// assert_eq!(type_name(&json!({"a": 1})), "mapping");
/// ```
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Derive a shallow schema descriptor from a document
///
/// Arrays are unwrapped to their first element. Empty arrays and anything
/// that is not an object yield an empty descriptor. Nested values are not
/// described.
///
/// # Examples
///
/// ```
/// use schemabridge::schema::{extract_schema, FieldDescriptor};
/// use serde_json::json;
///
/// let schema = extract_schema(&json!([{"a": 1, "b": "x"}]));
/// assert_eq!(
///     schema,
///     vec![
///         FieldDescriptor::new("a", "integer"),
///         FieldDescriptor::new("b", "string"),
///     ]
/// );
/// ```
pub fn extract_schema(document: &Value) -> SchemaDescriptor {
    let record = match document {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Vec::new(),
        },
        other => other,
    };

    match record {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| FieldDescriptor::new(key.clone(), type_name(value)))
            .collect(),
        _ => Vec::new(),
    }
}
