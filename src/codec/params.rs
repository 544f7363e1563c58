//! Flat form parameter set and the encoding rules for individual fields.

use crate::{Error, ErrorContext, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Options types write themselves into a [`Params`] set.
///
/// Implementations push fields in declaration order so that identical values
/// always produce an identical parameter list.
pub trait FormEncode {
    fn encode(&self, params: &mut Params) -> Result<()>;
}

/// Scalar values that render as a single form value.
pub trait ParamValue {
    fn to_param(&self) -> String;
}

impl ParamValue for String {
    fn to_param(&self) -> String {
        self.clone()
    }
}

impl ParamValue for &str {
    fn to_param(&self) -> String {
        (*self).to_string()
    }
}

impl ParamValue for bool {
    fn to_param(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

macro_rules! impl_param_value_for_int {
    ($($t:ty),*) => {
        $(impl ParamValue for $t {
            fn to_param(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_param_value_for_int!(i32, i64, u32, u64, usize);

/// Ordered list of `key=value` pairs ready for form or query encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn push(&mut self, key: &str, value: impl ParamValue) {
        self.pairs.push((key.to_string(), value.to_param()));
    }

    /// Push only when set. Unset fields never reach the wire.
    pub fn push_opt<V: ParamValue>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.push(key, v);
        }
    }

    /// Push a decimal at full precision.
    ///
    /// Values with more than `max_places` decimal places are rejected rather
    /// than rounded.
    pub fn push_decimal(
        &mut self,
        key: &str,
        value: Option<Decimal>,
        max_places: u32,
    ) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let normalized = value.normalize();
        if normalized.scale() > max_places {
            return Err(Error::validation_with_context(
                format!("at most {} decimal places allowed", max_places),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(value.to_string())
                    .with_source("codec"),
            ));
        }
        self.push(key, normalized.to_string());
        Ok(())
    }

    /// Push a percentage: a decimal in `0..=100` with bounded precision.
    pub fn push_percent(&mut self, key: &str, value: Option<Decimal>, max_places: u32) -> Result<()> {
        if let Some(v) = value {
            if v < Decimal::ZERO || v > Decimal::ONE_HUNDRED {
                return Err(Error::validation_with_context(
                    "percentage must be between 0 and 100",
                    ErrorContext::new()
                        .with_field_path(key)
                        .with_details(v.to_string())
                        .with_source("codec"),
                ));
            }
        }
        self.push_decimal(key, value, max_places)
    }

    /// Push a timestamp as whole seconds since the Unix epoch.
    pub fn push_timestamp(&mut self, key: &str, value: Option<OffsetDateTime>) {
        self.push_opt(key, value.map(OffsetDateTime::unix_timestamp));
    }

    /// `metadata[k]=v` for every entry, in key order.
    pub fn push_map(&mut self, key: &str, map: Option<&BTreeMap<String, String>>) {
        for (k, v) in map.into_iter().flatten() {
            self.pairs.push((format!("{}[{}]", key, k), v.clone()));
        }
    }

    /// `expand[0]=a&expand[1]=b`.
    pub fn push_list<V: ParamValue>(&mut self, key: &str, values: &[V]) {
        for (idx, v) in values.iter().enumerate() {
            self.pairs.push((format!("{}[{}]", key, idx), v.to_param()));
        }
    }

    /// Encode a nested options value under `key[...]`.
    pub fn push_nested<T: FormEncode>(&mut self, key: &str, value: Option<&T>) -> Result<()> {
        if let Some(v) = value {
            let mut child = Params::new();
            v.encode(&mut child)?;
            self.extend_prefixed(key, child);
        }
        Ok(())
    }

    /// Encode a list of nested values as `key[0][...]`, `key[1][...]`.
    pub fn push_nested_list<T: FormEncode>(&mut self, key: &str, values: &[T]) -> Result<()> {
        for (idx, v) in values.iter().enumerate() {
            let mut child = Params::new();
            v.encode(&mut child)?;
            self.extend_prefixed(&format!("{}[{}]", key, idx), child);
        }
        Ok(())
    }

    /// Append another parameter set without prefixing.
    pub fn extend(&mut self, other: Params) {
        self.pairs.extend(other.pairs);
    }

    fn extend_prefixed(&mut self, prefix: &str, child: Params) {
        for (k, v) in child.pairs {
            self.pairs.push((nest_key(prefix, &k), v));
        }
    }

    /// Replace every value stored under `key`, or append it.
    pub(crate) fn set(&mut self, key: &str, value: impl ParamValue) {
        self.remove(key);
        self.push(key, value);
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// `application/x-www-form-urlencoded` rendering.
    pub fn to_form_string(&self) -> Result<String> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| {
            Error::validation_with_context(
                format!("cannot form-encode parameters: {}", e),
                ErrorContext::new().with_source("codec"),
            )
        })
    }
}

/// `nest_key("source", "number")` is `source[number]`;
/// `nest_key("card", "metadata[a]")` is `card[metadata][a]`.
fn nest_key(prefix: &str, key: &str) -> String {
    match key.find('[') {
        Some(idx) => format!("{}[{}]{}", prefix, &key[..idx], &key[idx..]),
        None => format!("{}[{}]", prefix, key),
    }
}

/// Resolve a deprecated alias: the replacement wins, the deprecated value is
/// only a fallback.
pub fn prefer<T>(current: Option<T>, deprecated: Option<T>) -> Option<T> {
    current.or(deprecated)
}

/// Encode an options value into a fresh parameter set.
pub fn encode<T: FormEncode + ?Sized>(options: &T) -> Result<Params> {
    let mut params = Params::new();
    options.encode(&mut params)?;
    Ok(params)
}
