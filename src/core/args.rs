//! Named arguments passed alongside the current state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keyword-style arguments shared by guards and actions.
///
/// Guards and actions of one transition receive the same arguments, so an
/// engine can pass e.g. a search term to both the guard deciding whether the
/// search box is usable and the action typing into it.
///
/// # Example
///
/// ```rust
/// use statewalk::core::NamedArgs;
/// use serde_json::json;
///
/// let args = NamedArgs::new().with("query", "rust").with("limit", 10);
///
/// assert_eq!(args.get("query"), Some(&json!("rust")));
/// assert_eq!(args.get_str("query"), Some("rust"));
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedArgs {
    entries: BTreeMap<String, Value>,
}

impl NamedArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an argument, returning any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get an argument as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Get an argument as an `i64`, if it is an integral JSON number.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.entries.get(key).and_then(Value::as_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for NamedArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
