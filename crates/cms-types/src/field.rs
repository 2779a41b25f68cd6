use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single metadata attribute value.
///
/// Inbound forms submit either text or numbers (e.g. an event venue versus a
/// placement year); both are preserved as submitted rather than coerced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free-form text.
    Text(String),
    /// Numeric value (year, package in LPA, head count).
    Number(f64),
}

impl FieldValue {
    /// Returns `true` if the value is empty text or a non-finite number.
    ///
    /// Whitespace-only text counts as empty: a form field full of spaces is
    /// not a usable title.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => !n.is_finite(),
        }
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// Type-specific metadata attributes for a content item.
///
/// A `BTreeMap` keeps serialized records key-ordered, so re-serializing an
/// unchanged collection produces identical bytes (the collection-document
/// index backend depends on this for its version tokens).
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Build a [`FieldMap`] from `(name, value)` pairs.
pub fn field_map<V: Into<FieldValue>>(pairs: impl IntoIterator<Item = (&'static str, V)>) -> FieldMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_emptiness() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::from("   ").is_empty());
        assert!(!FieldValue::from("Freshers Day").is_empty());
    }

    #[test]
    fn number_emptiness() {
        assert!(!FieldValue::from(2024i64).is_empty());
        assert!(FieldValue::Number(f64::NAN).is_empty());
        assert!(FieldValue::Number(f64::INFINITY).is_empty());
    }

    #[test]
    fn untagged_serde() {
        let text: FieldValue = serde_json::from_str("\"Acme Corp\"").unwrap();
        assert_eq!(text, FieldValue::from("Acme Corp"));

        let num: FieldValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(num, FieldValue::Number(12.5));
    }

    #[test]
    fn field_map_is_key_ordered() {
        let fields = field_map([("title", "a"), ("description", "b")]);
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, ["description", "title"]);
    }

    #[test]
    fn display_renders_both_kinds() {
        assert_eq!(FieldValue::from("hi").to_string(), "hi");
        assert_eq!(FieldValue::from(2024i64).to_string(), "2024");
    }
}
