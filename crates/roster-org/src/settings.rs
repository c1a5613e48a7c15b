//! Opaque settings and profile bags
//!
//! Users, organizations, and members all carry free-form key/value bags for
//! application data the service does not interpret. The bag restricts values
//! to a JSON-shaped union instead of accepting arbitrary dynamic payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value stored in a [`SettingsBag`].
///
/// The union covers null, booleans, numbers, strings, and nested
/// lists/maps, the shapes JSON settings payloads actually take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value (stored as f64).
    Number(f64),
    /// Text value.
    String(String),
    /// Ordered list of values.
    List(Vec<SettingValue>),
    /// Nested string-keyed map.
    Map(BTreeMap<String, SettingValue>),
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<serde_json::Value> for SettingValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(SettingValue::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, SettingValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// An opaque string-keyed bag of [`SettingValue`]s.
///
/// Serializes transparently as a JSON object, so an empty bag is `{}`.
///
/// # Examples
///
/// ```
/// use roster_org::SettingsBag;
///
/// let mut bag = SettingsBag::new();
/// bag.insert("theme", "dark");
/// bag.insert("notifications", true);
/// assert_eq!(bag.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsBag(BTreeMap<String, SettingValue>);

impl SettingsBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the bag has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.0.remove(key)
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, SettingValue)> for SettingsBag {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bag_serializes_as_object() {
        let bag = SettingsBag::new();
        assert_eq!(serde_json::to_string(&bag).unwrap(), "{}");
    }

    #[test]
    fn test_insert_and_get() {
        let mut bag = SettingsBag::new();
        bag.insert("theme", "dark");
        bag.insert("limit", 42i64);
        bag.insert("beta", true);

        assert_eq!(bag.get("theme"), Some(&SettingValue::String("dark".into())));
        assert_eq!(bag.get("limit"), Some(&SettingValue::Number(42.0)));
        assert_eq!(bag.get("beta"), Some(&SettingValue::Bool(true)));
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn test_round_trip_nested() {
        let json = serde_json::json!({
            "profile": { "name": "Ada", "tags": ["admin", "ops"] },
            "active": true,
            "score": 1.5,
            "note": null
        });
        let bag: SettingsBag = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&bag).unwrap(), json);
    }

    #[test]
    fn test_from_json_value() {
        let value = serde_json::json!(["a", 1, false]);
        let converted = SettingValue::from(value);
        assert_eq!(
            converted,
            SettingValue::List(vec![
                SettingValue::String("a".into()),
                SettingValue::Number(1.0),
                SettingValue::Bool(false),
            ])
        );
    }
}
