//! Key/value annotations attached to a transition.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved metadata key holding a transition's target state name.
pub const TARGET_NAME_KEY: &str = "target_name";

/// Mutable annotation store. Last write wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `key`, replacing any previous value, and return a
    /// reference to the stored value.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &Value {
        let key = key.into();
        self.entries.insert(key.clone(), value.into());
        &self.entries[&key]
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }
}

impl From<BTreeMap<String, Value>> for Metadata {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}
