use crate::client::{resource_path, RequestOptions, StripeClient};
use crate::codec::{encode, prefer, FormEncode, Params};
use crate::pagination::{ListOptions, Paginator};
use crate::resources::shared::{push_source, BaseOptions, CardOptions, DateFilter};
use crate::types::{Extra, List, Metadata, Object};
use crate::{Error, ErrorContext, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const PATH: &str = "/v1/subscriptions";

/// Decimal places accepted for `application_fee_percent`.
pub const APPLICATION_FEE_PERCENT_PLACES: u32 = 2;
/// Decimal places accepted for `tax_percent`.
pub const TAX_PERCENT_PLACES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    ChargeAutomatically,
    SendInvoice,
    #[serde(other)]
    Unknown,
}

impl Billing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Billing::ChargeAutomatically => "charge_automatically",
            Billing::SendInvoice => "send_invoice",
            Billing::Unknown => "unknown",
        }
    }

    fn wire_value(self, field: &str) -> Result<&'static str> {
        match self {
            Billing::Unknown => Err(decode_only(field)),
            known => Ok(known.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    fn wire_value(self, field: &str) -> Result<&'static str> {
        match self {
            SubscriptionStatus::Unknown => Err(decode_only(field)),
            known => Ok(known.as_str()),
        }
    }
}

/// `Unknown` only stands in for values this client does not recognize yet.
fn decode_only(field: &str) -> Error {
    Error::validation_with_context(
        "unknown value cannot be sent",
        ErrorContext::new()
            .with_field_path(field)
            .with_source("subscriptions"),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub id: String,
    pub object: String,
    pub active: bool,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub interval_count: Option<u32>,
    pub nickname: Option<String>,
    pub product: Option<String>,
    pub trial_period_days: Option<u32>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionItem {
    pub id: String,
    pub object: String,
    #[serde(with = "time::serde::timestamp::option")]
    pub created: Option<OffsetDateTime>,
    pub plan: Option<Plan>,
    pub quantity: Option<u64>,
    pub subscription: Option<String>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub id: String,
    pub object: String,
    pub application_fee_percent: Option<Decimal>,
    pub billing: Option<Billing>,
    #[serde(with = "time::serde::timestamp::option")]
    pub billing_cycle_anchor: Option<OffsetDateTime>,
    pub cancel_at_period_end: bool,
    #[serde(with = "time::serde::timestamp::option")]
    pub canceled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub current_period_end: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub current_period_start: Option<OffsetDateTime>,
    pub customer: Option<String>,
    pub days_until_due: Option<u32>,
    #[serde(with = "time::serde::timestamp::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub items: Option<List<SubscriptionItem>>,
    pub livemode: bool,
    pub metadata: Metadata,
    pub plan: Option<Plan>,
    pub quantity: Option<u64>,
    #[serde(with = "time::serde::timestamp::option")]
    pub start: Option<OffsetDateTime>,
    pub status: Option<SubscriptionStatus>,
    pub tax_percent: Option<Decimal>,
    #[serde(with = "time::serde::timestamp::option")]
    pub trial_end: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub trial_start: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Object for Subscription {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl Object for SubscriptionItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl Object for Plan {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

/// One entry of `items[]` on create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionItemOptions {
    /// Existing item to change; update only.
    pub id: Option<String>,
    pub plan: Option<String>,
    pub quantity: Option<u64>,
    /// Remove the item named by `id`; update only.
    pub deleted: Option<bool>,
    pub metadata: Option<Metadata>,
}

impl SubscriptionItemOptions {
    pub fn plan(plan: impl Into<String>) -> Self {
        Self {
            plan: Some(plan.into()),
            ..Default::default()
        }
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

impl FormEncode for SubscriptionItemOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_opt("id", self.id.as_deref());
        params.push_opt("plan", self.plan.as_deref());
        params.push_opt("quantity", self.quantity);
        params.push_opt("deleted", self.deleted);
        params.push_map("metadata", self.metadata.as_ref());
        Ok(())
    }
}

/// Fields accepted by both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSharedOptions {
    /// At most two decimal places.
    pub application_fee_percent: Option<Decimal>,
    pub billing: Option<Billing>,
    pub coupon: Option<String>,
    /// Only meaningful with `billing = send_invoice`.
    pub days_until_due: Option<u32>,
    pub prorate: Option<bool>,
    /// Token or source ID. Excludes `source_card`.
    pub source: Option<String>,
    pub source_card: Option<CardOptions>,
    #[deprecated(note = "use `source_card`")]
    pub card: Option<CardOptions>,
    /// At most four decimal places.
    pub tax_percent: Option<Decimal>,
    pub trial_end: Option<OffsetDateTime>,
    /// Sends `trial_end=now`, ignoring `trial_end`.
    pub end_trial_now: bool,
    pub trial_from_plan: Option<bool>,
    #[deprecated(note = "use `items`")]
    pub plan: Option<String>,
    #[deprecated(note = "use `items`")]
    pub quantity: Option<u64>,
    pub base: BaseOptions,
}

impl SubscriptionSharedOptions {
    #[allow(deprecated)]
    fn encode_fields(&self, params: &mut Params) -> Result<()> {
        params.push_percent(
            "application_fee_percent",
            self.application_fee_percent,
            APPLICATION_FEE_PERCENT_PLACES,
        )?;
        if let Some(billing) = self.billing {
            params.push("billing", billing.wire_value("billing")?);
        }
        params.push_opt("coupon", self.coupon.as_deref());
        params.push_opt("days_until_due", self.days_until_due);
        params.push_opt("prorate", self.prorate);
        push_source(
            params,
            self.source.as_deref(),
            self.source_card.as_ref(),
            self.card.as_ref(),
        )?;
        params.push_percent("tax_percent", self.tax_percent, TAX_PERCENT_PLACES)?;
        if self.end_trial_now {
            params.push("trial_end", "now");
        } else {
            params.push_timestamp("trial_end", self.trial_end);
        }
        params.push_opt("trial_from_plan", self.trial_from_plan);
        self.base.encode(params)
    }

    /// `items[]` wins; the deprecated top-level plan/quantity pair becomes
    /// `items[0]` only when no items are given.
    #[allow(deprecated)]
    fn encode_items(&self, params: &mut Params, items: &[SubscriptionItemOptions]) -> Result<()> {
        if !items.is_empty() {
            return params.push_nested_list("items", items);
        }
        let legacy = SubscriptionItemOptions {
            plan: self.plan.clone(),
            quantity: self.quantity,
            ..Default::default()
        };
        if legacy.plan.is_some() || legacy.quantity.is_some() {
            params.push_nested_list("items", std::slice::from_ref(&legacy))?;
        }
        Ok(())
    }
}

impl FormEncode for SubscriptionSharedOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        self.encode_items(params, &[])?;
        self.encode_fields(params)
    }
}

/// `POST /v1/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionCreateOptions {
    pub customer: String,
    pub items: Vec<SubscriptionItemOptions>,
    pub billing_cycle_anchor: Option<OffsetDateTime>,
    pub shared: SubscriptionSharedOptions,
}

impl SubscriptionCreateOptions {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            ..Default::default()
        }
    }

    pub fn item(mut self, item: SubscriptionItemOptions) -> Self {
        self.items.push(item);
        self
    }
}

impl FormEncode for SubscriptionCreateOptions {
    #[allow(deprecated)]
    fn encode(&self, params: &mut Params) -> Result<()> {
        if self.customer.trim().is_empty() {
            return Err(Error::validation_with_context(
                "customer is required",
                ErrorContext::new()
                    .with_field_path("customer")
                    .with_source("subscriptions"),
            ));
        }
        let plan = prefer(
            self.items.first().and_then(|i| i.plan.as_deref()),
            self.shared.plan.as_deref(),
        );
        if plan.is_none() || self.items.iter().any(|i| i.plan.is_none()) {
            return Err(Error::validation_with_context(
                "every subscription item needs a plan",
                ErrorContext::new()
                    .with_field_path("items")
                    .with_source("subscriptions"),
            ));
        }
        params.push("customer", self.customer.as_str());
        self.shared.encode_items(params, &self.items)?;
        params.push_timestamp("billing_cycle_anchor", self.billing_cycle_anchor);
        self.shared.encode_fields(params)
    }
}

/// `POST /v1/subscriptions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdateOptions {
    pub items: Vec<SubscriptionItemOptions>,
    pub shared: SubscriptionSharedOptions,
}

impl FormEncode for SubscriptionUpdateOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        self.shared.encode_items(params, &self.items)?;
        self.shared.encode_fields(params)
    }
}

/// `DELETE /v1/subscriptions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionCancelOptions {
    /// Keep the subscription active until the current period ends.
    pub at_period_end: Option<bool>,
}

impl FormEncode for SubscriptionCancelOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_opt("at_period_end", self.at_period_end);
        Ok(())
    }
}

/// `GET /v1/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionListOptions {
    pub billing: Option<Billing>,
    pub created: Option<DateFilter>,
    pub customer: Option<String>,
    pub plan: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub list: ListOptions,
}

impl FormEncode for SubscriptionListOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        if let Some(billing) = self.billing {
            params.push("billing", billing.wire_value("billing")?);
        }
        params.push_nested("created", self.created.as_ref())?;
        params.push_opt("customer", self.customer.as_deref());
        params.push_opt("plan", self.plan.as_deref());
        if let Some(status) = self.status {
            params.push("status", status.wire_value("status")?);
        }
        self.list.encode(params)
    }
}

pub struct SubscriptionService<'a> {
    client: &'a StripeClient,
}

impl<'a> SubscriptionService<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        create: &SubscriptionCreateOptions,
        options: &RequestOptions,
    ) -> Result<Subscription> {
        self.client.post(PATH, &encode(create)?, options).await
    }

    pub async fn retrieve(&self, id: &str, options: &RequestOptions) -> Result<Subscription> {
        self.client.get(&resource_path(PATH, id)?, &Params::new(), options).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &SubscriptionUpdateOptions,
        options: &RequestOptions,
    ) -> Result<Subscription> {
        self.client
            .post(&resource_path(PATH, id)?, &encode(update)?, options)
            .await
    }

    pub async fn cancel(
        &self,
        id: &str,
        cancel: &SubscriptionCancelOptions,
        options: &RequestOptions,
    ) -> Result<Subscription> {
        self.client
            .delete(&resource_path(PATH, id)?, &encode(cancel)?, options)
            .await
    }

    pub async fn list(
        &self,
        list: &SubscriptionListOptions,
        options: &RequestOptions,
    ) -> Result<List<Subscription>> {
        self.client.get(PATH, &encode(list)?, options).await
    }

    pub fn list_auto_paging(
        &self,
        list: &SubscriptionListOptions,
        options: RequestOptions,
    ) -> Result<Paginator<Subscription>> {
        Ok(Paginator::new(self.client.clone(), PATH, encode(list)?, options))
    }
}
