use crate::client::{resource_path, RequestOptions, StripeClient};
use crate::codec::{encode, Expandable, FormEncode, Params};
use crate::pagination::{ListOptions, Paginator};
use crate::resources::balance_transactions::BalanceTransaction;
use crate::resources::payment_source::PaymentSource;
use crate::resources::shared::{push_source, BaseOptions, CardOptions, DateFilter};
use crate::types::{Extra, List, Metadata, Object};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const PATH: &str = "/v1/charges";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charge {
    pub id: String,
    pub object: String,
    pub amount: i64,
    pub amount_refunded: i64,
    pub application_fee_amount: Option<i64>,
    /// Bare ID unless requested with `expand[]=balance_transaction`.
    pub balance_transaction: Option<Expandable<BalanceTransaction>>,
    pub captured: bool,
    #[serde(with = "time::serde::timestamp::option")]
    pub created: Option<OffsetDateTime>,
    pub currency: Option<String>,
    pub customer: Option<String>,
    pub description: Option<String>,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
    pub livemode: bool,
    pub metadata: Metadata,
    pub paid: bool,
    pub receipt_email: Option<String>,
    pub refunded: bool,
    pub source: Option<PaymentSource>,
    pub statement_descriptor: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Object for Charge {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

/// `POST /v1/charges`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeCreateOptions {
    /// Smallest currency unit (cents for `usd`).
    pub amount: i64,
    pub currency: String,
    pub application_fee_amount: Option<i64>,
    /// `false` only authorizes; capture later with [`ChargeService::capture`].
    pub capture: Option<bool>,
    pub customer: Option<String>,
    pub description: Option<String>,
    pub receipt_email: Option<String>,
    /// Token or source ID. Excludes `source_card`.
    pub source: Option<String>,
    pub source_card: Option<CardOptions>,
    #[deprecated(note = "use `source_card`")]
    pub card: Option<CardOptions>,
    pub statement_descriptor: Option<String>,
    pub base: BaseOptions,
}

impl ChargeCreateOptions {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            ..Default::default()
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source_card(mut self, card: CardOptions) -> Self {
        self.source_card = Some(card);
        self
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = Some(capture);
        self
    }
}

impl FormEncode for ChargeCreateOptions {
    #[allow(deprecated)]
    fn encode(&self, params: &mut Params) -> Result<()> {
        if self.amount <= 0 {
            return Err(Error::validation_with_context(
                "amount must be positive",
                ErrorContext::new()
                    .with_field_path("amount")
                    .with_details(self.amount.to_string())
                    .with_source("charges"),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::validation_with_context(
                "currency is required",
                ErrorContext::new()
                    .with_field_path("currency")
                    .with_source("charges"),
            ));
        }
        params.push("amount", self.amount);
        params.push("currency", self.currency.as_str());
        params.push_opt("application_fee_amount", self.application_fee_amount);
        params.push_opt("capture", self.capture);
        params.push_opt("customer", self.customer.as_deref());
        params.push_opt("description", self.description.as_deref());
        params.push_opt("receipt_email", self.receipt_email.as_deref());
        push_source(
            params,
            self.source.as_deref(),
            self.source_card.as_ref(),
            self.card.as_ref(),
        )?;
        params.push_opt("statement_descriptor", self.statement_descriptor.as_deref());
        self.base.encode(params)
    }
}

/// `POST /v1/charges/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeUpdateOptions {
    pub customer: Option<String>,
    pub description: Option<String>,
    pub receipt_email: Option<String>,
    pub base: BaseOptions,
}

impl FormEncode for ChargeUpdateOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_opt("customer", self.customer.as_deref());
        params.push_opt("description", self.description.as_deref());
        params.push_opt("receipt_email", self.receipt_email.as_deref());
        self.base.encode(params)
    }
}

/// `POST /v1/charges/{id}/capture`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeCaptureOptions {
    /// Capture less than the authorized amount; the rest is released.
    pub amount: Option<i64>,
    pub application_fee_amount: Option<i64>,
    pub receipt_email: Option<String>,
    pub statement_descriptor: Option<String>,
    pub expand: Vec<String>,
}

impl FormEncode for ChargeCaptureOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_opt("amount", self.amount);
        params.push_opt("application_fee_amount", self.application_fee_amount);
        params.push_opt("receipt_email", self.receipt_email.as_deref());
        params.push_opt("statement_descriptor", self.statement_descriptor.as_deref());
        params.push_list("expand", &self.expand);
        Ok(())
    }
}

/// `GET /v1/charges`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeListOptions {
    pub created: Option<DateFilter>,
    pub customer: Option<String>,
    pub list: ListOptions,
}

impl FormEncode for ChargeListOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_nested("created", self.created.as_ref())?;
        params.push_opt("customer", self.customer.as_deref());
        self.list.encode(params)
    }
}

pub struct ChargeService<'a> {
    client: &'a StripeClient,
}

impl<'a> ChargeService<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, create: &ChargeCreateOptions, options: &RequestOptions) -> Result<Charge> {
        self.client.post(PATH, &encode(create)?, options).await
    }

    pub async fn retrieve(&self, id: &str, options: &RequestOptions) -> Result<Charge> {
        self.client.get(&resource_path(PATH, id)?, &Params::new(), options).await
    }

    /// Retrieve with reference fields expanded, e.g. `["balance_transaction"]`.
    pub async fn retrieve_expanded(
        &self,
        id: &str,
        expand: &[&str],
        options: &RequestOptions,
    ) -> Result<Charge> {
        let mut params = Params::new();
        params.push_list("expand", expand);
        self.client.get(&resource_path(PATH, id)?, &params, options).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &ChargeUpdateOptions,
        options: &RequestOptions,
    ) -> Result<Charge> {
        self.client
            .post(&resource_path(PATH, id)?, &encode(update)?, options)
            .await
    }

    pub async fn capture(
        &self,
        id: &str,
        capture: &ChargeCaptureOptions,
        options: &RequestOptions,
    ) -> Result<Charge> {
        let path = format!("{}/capture", resource_path(PATH, id)?);
        self.client.post(&path, &encode(capture)?, options).await
    }

    pub async fn list(&self, list: &ChargeListOptions, options: &RequestOptions) -> Result<List<Charge>> {
        self.client.get(PATH, &encode(list)?, options).await
    }

    pub fn list_auto_paging(
        &self,
        list: &ChargeListOptions,
        options: RequestOptions,
    ) -> Result<Paginator<Charge>> {
        Ok(Paginator::new(self.client.clone(), PATH, encode(list)?, options))
    }
}
