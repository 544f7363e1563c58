//! Options fragments embedded by several resources.

use crate::codec::{FormEncode, Params};
use crate::types::Metadata;
use crate::{Error, ErrorContext, Result};
use time::OffsetDateTime;

/// Fields every mutating or retrieving call accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseOptions {
    pub metadata: Option<Metadata>,
    /// Reference fields to return as full objects (`expand[0]=customer`).
    pub expand: Vec<String>,
}

impl BaseOptions {
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn expand(mut self, field: impl Into<String>) -> Self {
        self.expand.push(field.into());
        self
    }
}

impl FormEncode for BaseOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_map("metadata", self.metadata.as_ref());
        params.push_list("expand", &self.expand);
        Ok(())
    }
}

/// Inline card details, sent as `source[...]` instead of a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardOptions {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: Option<String>,
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub address_country: Option<String>,
    pub metadata: Option<Metadata>,
}

impl CardOptions {
    pub fn new(number: impl Into<String>, exp_month: u32, exp_year: u32) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            ..Default::default()
        }
    }

    pub fn cvc(mut self, cvc: impl Into<String>) -> Self {
        self.cvc = Some(cvc.into());
        self
    }
}

impl FormEncode for CardOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        if !(1..=12).contains(&self.exp_month) {
            return Err(Error::validation_with_context(
                "card expiry month must be 1..=12",
                ErrorContext::new()
                    .with_field_path("exp_month")
                    .with_details(self.exp_month.to_string())
                    .with_source("codec"),
            ));
        }
        params.push("object", "card");
        params.push("number", self.number.as_str());
        params.push("exp_month", self.exp_month);
        params.push("exp_year", self.exp_year);
        params.push_opt("cvc", self.cvc.as_deref());
        params.push_opt("name", self.name.as_deref());
        params.push_opt("address_line1", self.address_line1.as_deref());
        params.push_opt("address_line2", self.address_line2.as_deref());
        params.push_opt("address_city", self.address_city.as_deref());
        params.push_opt("address_state", self.address_state.as_deref());
        params.push_opt("address_zip", self.address_zip.as_deref());
        params.push_opt("address_country", self.address_country.as_deref());
        params.push_map("metadata", self.metadata.as_ref());
        Ok(())
    }
}

/// Range filter on a timestamp field, e.g. `created[gte]=...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub gt: Option<OffsetDateTime>,
    pub gte: Option<OffsetDateTime>,
    pub lt: Option<OffsetDateTime>,
    pub lte: Option<OffsetDateTime>,
}

impl DateFilter {
    pub fn since(at: OffsetDateTime) -> Self {
        Self {
            gte: Some(at),
            ..Default::default()
        }
    }

    pub fn before(at: OffsetDateTime) -> Self {
        Self {
            lt: Some(at),
            ..Default::default()
        }
    }
}

impl FormEncode for DateFilter {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_timestamp("gt", self.gt);
        params.push_timestamp("gte", self.gte);
        params.push_timestamp("lt", self.lt);
        params.push_timestamp("lte", self.lte);
        Ok(())
    }
}

/// Where a payment source comes from: a token/ID or inline card details.
///
/// Both map to the single `source` wire key, so only one may be set.
pub(crate) fn push_source(
    params: &mut Params,
    source: Option<&str>,
    source_card: Option<&CardOptions>,
    deprecated_card: Option<&CardOptions>,
) -> Result<()> {
    if source.is_some() && source_card.is_some() {
        return Err(Error::validation_with_context(
            "source and source_card are mutually exclusive",
            ErrorContext::new()
                .with_field_path("source")
                .with_source("codec"),
        ));
    }
    if let Some(token) = source {
        params.push("source", token);
        return Ok(());
    }
    params.push_nested("source", crate::codec::prefer(source_card, deprecated_card))
}
