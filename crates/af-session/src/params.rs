//! Provider-supplied authentication parameters.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable snapshot of the parameters a provider returned at sign-in.
///
/// The caller's map is copied on construction; nothing mutates the snapshot
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthParameters {
    values: BTreeMap<String, Value>,
}

impl AuthParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Copies the given map.
    #[must_use]
    pub fn from_map(map: &HashMap<String, Value>) -> Self {
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Gets a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Gets a string parameter.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Checks whether a parameter is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over parameter names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AuthParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, Value>> for AuthParameters {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<&HashMap<String, Value>> for AuthParameters {
    fn from(map: &HashMap<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl From<BTreeMap<String, Value>> for AuthParameters {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}
