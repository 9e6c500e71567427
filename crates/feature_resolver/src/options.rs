//! Closed value type for feature options and configuration customizations.
//!
//! Option payloads are deliberately a closed variant rather than an
//! open `serde_json::Value`: every value a feature option or customization
//! can carry is one of a string, a number, a boolean, a string list, or a
//! nested map. This keeps payloads serializable without reflection-driven
//! runtime type inspection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;

/// A single feature option or customization value.
///
/// Serializes untagged, so the JSON shape matches the devcontainer
/// configuration format directly (`"value"`, `42`, `true`, `["a", "b"]`,
/// or a nested object).
///
/// # Examples
///
/// ```rust
/// use feature_resolver::OptionValue;
///
/// let value = OptionValue::StringList(vec!["rust-lang.rust-analyzer".to_string()]);
/// let json = serde_json::to_string(&value).unwrap();
/// assert_eq!(json, r#"["rust-lang.rust-analyzer"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag, e.g. `"installZsh": true`.
    Bool(bool),
    /// Numeric value. Stored as `f64` to cover both integer and float JSON.
    Number(f64),
    /// Plain string value.
    String(String),
    /// Homogeneous list of strings, e.g. an extension id list.
    StringList(Vec<String>),
    /// Nested map of values, e.g. editor settings blocks.
    Map(BTreeMap<String, OptionValue>),
}

impl OptionValue {
    /// Whether this value carries no payload worth persisting.
    ///
    /// Empty strings, empty lists and empty maps are treated as absent when
    /// applying user custom settings; scalars are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            OptionValue::Bool(_) | OptionValue::Number(_) => false,
            OptionValue::String(value) => value.is_empty(),
            OptionValue::StringList(values) => values.is_empty(),
            OptionValue::Map(entries) => entries.is_empty(),
        }
    }

    /// Returns the contained string list, if this is a list value.
    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::StringList(values) => Some(values),
            _ => None,
        }
    }

    /// Name of the variant, used in option validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Number(_) => "number",
            OptionValue::String(_) => "string",
            OptionValue::StringList(_) => "string list",
            OptionValue::Map(_) => "map",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{}", value),
            OptionValue::Number(value) => write!(f, "{}", value),
            OptionValue::String(value) => write!(f, "{}", value),
            OptionValue::StringList(values) => write!(f, "[{}]", values.join(", ")),
            OptionValue::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        OptionValue::StringList(values)
    }
}
