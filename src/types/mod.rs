//! Core entity traits and shared response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key/value pairs attached to most resources.
pub type Metadata = BTreeMap<String, String>;

/// Catch-all for fields this client does not model yet.
pub type Extra = Map<String, Value>;

/// A resource snapshot returned by the API.
pub trait Object {
    /// Stable identifier, never empty for a resolved entity.
    fn id(&self) -> &str;

    /// Discriminator naming the concrete kind (`"charge"`, `"card"`, ...).
    fn object(&self) -> &str;
}

/// Fallback shape for entities whose kind this client does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Object for UnknownObject {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

/// One page of a list endpoint.
///
/// `data` keeps the server's order (usually newest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    #[serde(default = "list_object")]
    pub object: String,
    pub data: Vec<T>,
    pub has_more: bool,
    #[serde(default)]
    pub url: Option<String>,
}

fn list_object() -> String {
    "list".to_string()
}

impl<T> List<T> {
    pub fn new(data: Vec<T>, has_more: bool) -> Self {
        Self {
            object: list_object(),
            data,
            has_more,
            url: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new(Vec::new(), false)
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
