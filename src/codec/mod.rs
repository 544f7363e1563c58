//! 字段编解码：请求参数编码与响应实体解码。
//!
//! Field codec.
//!
//! Encoding turns a typed options value into a flat, ordered [`Params`] set
//! using the API's bracket notation (`metadata[key]`, `items[0][plan]`).
//! Decoding turns a JSON body into a typed entity; unknown fields are kept in
//! each entity's `extra` map instead of failing.
//!
//! | Rule | Where |
//! |------|-------|
//! | unset fields are omitted | [`Params::push_opt`] |
//! | decimals at full precision, bounded places | [`Params::push_decimal`] |
//! | timestamps as epoch seconds | [`Params::push_timestamp`] |
//! | deprecated field is a fallback only | [`prefer`] |
//! | polymorphic decode by `object` | [`decode_variant`] |

mod params;
mod polymorphic;

pub use params::{encode, prefer, FormEncode, ParamValue, Params};
pub use polymorphic::{decode_variant, discriminator, Expandable};

use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;

/// Decode a JSON body into `T`.
///
/// A body that is not JSON, or JSON of the wrong shape, is a decode error
/// tagged with the response status.
pub fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        Error::decode_with_context(
            status,
            e.to_string(),
            ErrorContext::new()
                .with_details(body_excerpt(body))
                .with_source("codec"),
        )
    })
}

/// First bytes of a body, for error messages.
pub(crate) fn body_excerpt(body: &[u8]) -> String {
    const MAX: usize = 200;
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}
