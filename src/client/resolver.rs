//! Response resolution: success entity or structured error.

use super::error_mapper::map_error;
use crate::codec;
use crate::transport::HttpResponse;
use crate::types::{List, Object};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;

/// A response shape the resolver can check after decoding.
pub trait Resolve: DeserializeOwned {
    /// Reject values that decoded but break entity invariants.
    fn check(&self) -> std::result::Result<(), String>;
}

impl<T: Object + DeserializeOwned> Resolve for T {
    fn check(&self) -> std::result::Result<(), String> {
        if self.id().is_empty() {
            return Err(format!("`{}` entity has an empty id", self.object()));
        }
        Ok(())
    }
}

impl<T: Object + DeserializeOwned> Resolve for List<T> {
    fn check(&self) -> std::result::Result<(), String> {
        for (idx, item) in self.data.iter().enumerate() {
            if item.id().is_empty() {
                return Err(format!("list item {} has an empty id", idx));
            }
        }
        Ok(())
    }
}

/// Classify `response` and decode it into `T` or a typed error.
pub(crate) fn resolve<T: Resolve>(response: &HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(Error::Api(map_error(response)));
    }
    let value: T = codec::decode(response.status, &response.body)?;
    value.check().map_err(|msg| {
        Error::decode_with_context(
            response.status,
            msg,
            ErrorContext::new().with_source("resolver"),
        )
    })?;
    Ok(value)
}
