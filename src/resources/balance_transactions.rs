use crate::client::{resource_path, RequestOptions, StripeClient};
use crate::codec::{encode, FormEncode, Params};
use crate::pagination::{ListOptions, Paginator};
use crate::resources::shared::DateFilter;
use crate::types::{Extra, List, Object};
use crate::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const PATH: &str = "/v1/balance_transactions";

/// A movement of funds on the account balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTransaction {
    pub id: String,
    pub object: String,
    pub amount: i64,
    #[serde(with = "time::serde::timestamp::option")]
    pub available_on: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub created: Option<OffsetDateTime>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub fee: i64,
    pub net: i64,
    /// ID of the charge, refund, transfer... that caused this movement.
    pub source: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Object for BalanceTransaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceTransactionListOptions {
    pub available_on: Option<DateFilter>,
    pub created: Option<DateFilter>,
    pub currency: Option<String>,
    pub payout: Option<String>,
    /// Only movements caused by this object, e.g. a charge ID.
    pub source: Option<String>,
    /// `charge`, `refund`, `payout`, ...
    pub transaction_type: Option<String>,
    pub list: ListOptions,
}

impl BalanceTransactionListOptions {
    pub fn source(mut self, id: impl Into<String>) -> Self {
        self.source = Some(id.into());
        self
    }

    pub fn transaction_type(mut self, kind: impl Into<String>) -> Self {
        self.transaction_type = Some(kind.into());
        self
    }
}

impl FormEncode for BalanceTransactionListOptions {
    fn encode(&self, params: &mut Params) -> Result<()> {
        params.push_nested("available_on", self.available_on.as_ref())?;
        params.push_nested("created", self.created.as_ref())?;
        params.push_opt("currency", self.currency.as_deref());
        params.push_opt("payout", self.payout.as_deref());
        params.push_opt("source", self.source.as_deref());
        params.push_opt("type", self.transaction_type.as_deref());
        self.list.encode(params)
    }
}

pub struct BalanceTransactionService<'a> {
    client: &'a StripeClient,
}

impl<'a> BalanceTransactionService<'a> {
    pub(crate) fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, id: &str, options: &RequestOptions) -> Result<BalanceTransaction> {
        let path = resource_path(PATH, id)?;
        self.client.get(&path, &Params::new(), options).await
    }

    pub async fn list(
        &self,
        list: &BalanceTransactionListOptions,
        options: &RequestOptions,
    ) -> Result<List<BalanceTransaction>> {
        self.client.get(PATH, &encode(list)?, options).await
    }

    pub fn list_auto_paging(
        &self,
        list: &BalanceTransactionListOptions,
        options: RequestOptions,
    ) -> Result<Paginator<BalanceTransaction>> {
        Ok(Paginator::new(self.client.clone(), PATH, encode(list)?, options))
    }
}
