//! Reversible masking of string literals
//!
//! Before a document is sent to an external model every string leaf is
//! replaced by an opaque placeholder token. The returned [`MaskingMap`]
//! records which literal each token stands for so the model's reply can be
//! restored with [`unmask`].
//!
//! Under the default [`MaskingPolicy::ObjectsOnly`] traversal, strings that
//! sit directly inside arrays are NOT masked; only strings reachable through
//! object fields are. [`MaskingPolicy::AllStrings`] closes that gap.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

const PLACEHOLDER_PREFIX: &str = "__MASKED_";
const PLACEHOLDER_SUFFIX: &str = "__";

/// Which string leaves a masking pass replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingPolicy {
    /// Mask object string fields, recursing into objects and arrays of objects.
    /// Strings inside arrays pass through unchanged.
    #[default]
    ObjectsOnly,
    /// Mask every string leaf, including strings inside (nested) arrays
    AllStrings,
}

impl MaskingPolicy {
    /// Parse a policy name as used in configuration files
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::masking::MaskingPolicy;
    ///
    /// assert_eq!(MaskingPolicy::parse_str("all_strings").unwrap(), MaskingPolicy::AllStrings);
    /// assert!(MaskingPolicy::parse_str("everything").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "objects_only" => Ok(Self::ObjectsOnly),
            "all_strings" => Ok(Self::AllStrings),
            other => Err(format!("Unknown masking policy: {}", other)),
        }
    }
}

impl fmt::Display for MaskingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectsOnly => write!(f, "objects_only"),
            Self::AllStrings => write!(f, "all_strings"),
        }
    }
}

/// Placeholder token to original literal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskingMap {
    entries: HashMap<String, String>,
}

impl MaskingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Original literal for a placeholder, if it was produced by this pass
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All placeholder tokens recorded in this map
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(placeholder, original)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, original)| (token.as_str(), original.as_str()))
    }

    fn record(&mut self, original: &str) -> String {
        let token = new_placeholder();
        self.entries.insert(token.clone(), original.to_string());
        token
    }
}

/// Generate a fresh placeholder token
pub fn new_placeholder() -> String {
    format!(
        "{}{}{}",
        PLACEHOLDER_PREFIX,
        Uuid::new_v4().simple(),
        PLACEHOLDER_SUFFIX
    )
}

/// Whether a string has the shape of a placeholder token
pub fn is_placeholder(s: &str) -> bool {
    s.len() == PLACEHOLDER_PREFIX.len() + 32 + PLACEHOLDER_SUFFIX.len()
        && s.starts_with(PLACEHOLDER_PREFIX)
        && s.ends_with(PLACEHOLDER_SUFFIX)
}

/// Masks string leaves according to a [`MaskingPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskingCodec {
    policy: MaskingPolicy,
}

impl MaskingCodec {
    pub fn new(policy: MaskingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MaskingPolicy {
        self.policy
    }

    /// Mask every string leaf of an object
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::masking::{unmask, MaskingCodec};
    /// use serde_json::json;
    ///
    /// let document = json!({"name": "Ada", "age": 36});
    /// let object = document.as_object().unwrap();
    ///
    /// let (masked, map) = MaskingCodec::default().mask(object);
    /// assert_ne!(masked["name"], "Ada");
    /// assert_eq!(masked["age"], 36);
    /// assert_eq!(&unmask(&masked, &map), object);
    /// ```
    pub fn mask(&self, document: &Map<String, Value>) -> (Map<String, Value>, MaskingMap) {
        let mut map = MaskingMap::new();
        let masked = self.mask_object(document, &mut map);
        (masked, map)
    }

    /// Mask any JSON value
    ///
    /// Objects are masked as in [`MaskingCodec::mask`]. A top-level array is
    /// treated like an array field: objects inside it are masked and plain
    /// strings only under [`MaskingPolicy::AllStrings`].
    pub fn mask_value(&self, document: &Value) -> (Value, MaskingMap) {
        let mut map = MaskingMap::new();
        let masked = self.mask_field(document, &mut map);
        (masked, map)
    }

    fn mask_object(&self, object: &Map<String, Value>, map: &mut MaskingMap) -> Map<String, Value> {
        object
            .iter()
            .map(|(key, value)| (key.clone(), self.mask_field(value, map)))
            .collect()
    }

    fn mask_field(&self, value: &Value, map: &mut MaskingMap) -> Value {
        match value {
            Value::String(s) => Value::String(map.record(s)),
            Value::Object(object) => Value::Object(self.mask_object(object, map)),
            Value::Array(items) => Value::Array(self.mask_sequence(items, map)),
            other => other.clone(),
        }
    }

    fn mask_sequence(&self, items: &[Value], map: &mut MaskingMap) -> Vec<Value> {
        items
            .iter()
            .map(|item| match (item, self.policy) {
                (Value::Object(object), _) => Value::Object(self.mask_object(object, map)),
                (Value::String(s), MaskingPolicy::AllStrings) => Value::String(map.record(s)),
                (Value::Array(nested), MaskingPolicy::AllStrings) => {
                    Value::Array(self.mask_sequence(nested, map))
                }
                (other, _) => other.clone(),
            })
            .collect()
    }
}

/// Mask an object with the default traversal policy
pub fn mask(document: &Map<String, Value>) -> (Map<String, Value>, MaskingMap) {
    MaskingCodec::default().mask(document)
}

/// Restore masked literals in an object
///
/// Every string leaf that is a key of `map` is replaced with its original
/// value, including strings directly inside arrays, so placeholders from
/// either policy are reachable. Strings that are not in the map (for example
/// a token the model altered) are left exactly as they are.
pub fn unmask(document: &Map<String, Value>, map: &MaskingMap) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), unmask_value(value, map)))
        .collect()
}

/// Restore masked literals in any JSON value
pub fn unmask_value(value: &Value, map: &MaskingMap) -> Value {
    match value {
        Value::String(s) => match map.get(s) {
            Some(original) => Value::String(original.to_string()),
            None => Value::String(s.clone()),
        },
        Value::Object(object) => Value::Object(unmask(object, map)),
        Value::Array(items) => Value::Array(items.iter().map(|v| unmask_value(v, map)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test document is an object")
    }

    fn sample() -> Map<String, Value> {
        object(json!({
            "id": 17,
            "name": "Grace Hopper",
            "active": true,
            "manager": null,
            "address": {"city": "Arlington", "zip": "22201", "geo": {"lat": 38.88}},
            "orders": [
                {"sku": "A-1", "qty": 2},
                {"sku": "B-2", "qty": 1}
            ],
            "tags": ["admiral", "cobol"],
            "scores": [1, 2, 3]
        }))
    }

    fn collect_strings(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
            Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
            _ => {}
        }
    }

    #[test]
    fn test_round_trip_restores_document() {
        let document = sample();
        let (masked, map) = mask(&document);
        assert_eq!(unmask(&masked, &map), document);
    }

    #[test]
    fn test_round_trip_all_strings_policy() {
        let document = object(json!({
            "tags": ["x", ["y", {"z": "w"}]],
            "name": "n"
        }));
        let codec = MaskingCodec::new(MaskingPolicy::AllStrings);
        let (masked, map) = codec.mask(&document);
        assert_eq!(map.len(), 4);
        assert_eq!(unmask(&masked, &map), document);
    }

    #[test]
    fn test_masked_object_strings_do_not_leak() {
        let document = sample();
        let (masked, map) = mask(&document);

        let mut strings = Vec::new();
        collect_strings(&Value::Object(masked), &mut strings);
        for original in ["Grace Hopper", "Arlington", "22201", "A-1", "B-2"] {
            assert!(!strings.iter().any(|s| s == original), "{} leaked", original);
        }
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_strings_in_plain_arrays_pass_through_by_default() {
        let (masked, map) = mask(&sample());
        assert_eq!(masked["tags"], json!(["admiral", "cobol"]));
        assert!(map.iter().all(|(_, original)| original != "admiral"));
    }

    #[test]
    fn test_all_strings_policy_masks_array_strings() {
        let codec = MaskingCodec::new(MaskingPolicy::AllStrings);
        let (masked, _) = codec.mask(&sample());
        let tags = masked["tags"].as_array().unwrap();
        assert!(tags.iter().all(|t| is_placeholder(t.as_str().unwrap())));
    }

    #[test]
    fn test_non_string_leaves_pass_through() {
        let (masked, _) = mask(&sample());
        assert_eq!(masked["id"], json!(17));
        assert_eq!(masked["active"], json!(true));
        assert_eq!(masked["manager"], Value::Null);
        assert_eq!(masked["scores"], json!([1, 2, 3]));
        assert_eq!(masked["address"]["geo"]["lat"], json!(38.88));
        assert_eq!(masked["orders"][1]["qty"], json!(1));
    }

    #[test]
    fn test_every_placeholder_has_one_entry() {
        let (masked, map) = mask(&sample());
        let mut strings = Vec::new();
        collect_strings(&Value::Object(masked), &mut strings);
        let placeholders: Vec<&String> = strings.iter().filter(|s| is_placeholder(s)).collect();
        assert_eq!(placeholders.len(), map.len());
        assert!(placeholders.iter().all(|p| map.get(p).is_some()));
    }

    #[test]
    fn test_two_passes_never_share_tokens() {
        let document = sample();
        let (_, first) = mask(&document);
        let (_, second) = mask(&document);
        let first_tokens: HashSet<&str> = first.tokens().collect();
        assert!(second.tokens().all(|t| !first_tokens.contains(t)));
    }

    #[test]
    fn test_repeated_literal_gets_distinct_tokens() {
        let (masked, map) = mask(&object(json!({"a": "same", "b": "same"})));
        assert_ne!(masked["a"], masked["b"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let (_, map) = mask(&object(json!({"a": "secret"})));
        let reply = object(json!({"a": "__MASKED_00000000000000000000000000000000__", "b": "model text"}));
        let restored = unmask(&reply, &map);
        assert_eq!(restored["a"], json!("__MASKED_00000000000000000000000000000000__"));
        assert_eq!(restored["b"], json!("model text"));
    }

    #[test]
    fn test_unmask_follows_reshaped_output() {
        let (masked, map) = mask(&object(json!({"first": "Ada", "last": "Lovelace"})));
        let reply = object(json!({
            "person": {"names": [masked["first"].clone(), masked["last"].clone()]}
        }));
        let restored = unmask(&reply, &map);
        assert_eq!(restored["person"]["names"], json!(["Ada", "Lovelace"]));
    }

    #[test]
    fn test_mask_value_top_level_array() {
        let document = json!([{"name": "a"}, {"name": "b"}, "loose"]);
        let (masked, map) = MaskingCodec::default().mask_value(&document);
        assert_eq!(map.len(), 2);
        assert_eq!(masked[2], json!("loose"));
        assert_eq!(unmask_value(&masked, &map), document);
    }

    #[test]
    fn test_placeholder_shape() {
        let token = new_placeholder();
        assert!(is_placeholder(&token));
        assert!(!is_placeholder("__MASKED_short__"));
        assert!(!is_placeholder("plain"));
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!(
            MaskingPolicy::parse_str("Objects_Only").unwrap(),
            MaskingPolicy::ObjectsOnly
        );
        assert_eq!(MaskingPolicy::AllStrings.to_string(), "all_strings");
        assert_eq!(MaskingPolicy::default(), MaskingPolicy::ObjectsOnly);
    }
}
