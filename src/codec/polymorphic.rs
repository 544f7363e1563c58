//! Discriminator-driven decoding.

use crate::types::Object;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `object` field that names an entity's concrete kind.
pub fn discriminator(value: &Value) -> Option<&str> {
    value.get("object").and_then(Value::as_str)
}

/// Decode an already-buffered JSON value into the variant chosen by the caller,
/// converting the error into the surrounding deserializer's error type.
pub fn decode_variant<T, E>(value: Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    serde_json::from_value(value).map_err(E::custom)
}

/// A reference that is either a bare ID or, when requested through
/// `expand[]`, the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T: Object> Expandable<T> {
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) => id,
            Expandable::Object(obj) => obj.id(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Expandable::Object(_))
    }

    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Id(_) => None,
            Expandable::Object(obj) => Some(obj),
        }
    }
}
