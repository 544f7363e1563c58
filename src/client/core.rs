use crate::client::context::RequestOptions;
use crate::client::policy::RetryPolicy;
use crate::client::resolver::Resolve;
use crate::codec::Params;
use crate::config::ClientConfig;
use crate::resources::{BalanceTransactionService, ChargeService, SubscriptionService};
use crate::transport::{Method, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Client for the REST API.
///
/// Cheap to clone: configuration, transport and retry policy are shared and
/// read-only, so one client can serve any number of concurrent calls.
#[derive(Clone)]
pub struct StripeClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) policy: Arc<RetryPolicy>,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Client with the given secret key; everything else from env and defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        crate::client::builder::StripeClientBuilder::new()
            .api_key(api_key)
            .build()
    }

    pub fn builder() -> crate::client::builder::StripeClientBuilder {
        crate::client::builder::StripeClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn charges(&self) -> ChargeService<'_> {
        ChargeService::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionService<'_> {
        SubscriptionService::new(self)
    }

    pub fn balance_transactions(&self) -> BalanceTransactionService<'_> {
        BalanceTransactionService::new(self)
    }

    /// Issue a call and decode the result; see [`StripeClient::request_with_stats`].
    pub async fn request<T: Resolve>(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<T> {
        Ok(self
            .request_with_stats(method, path, params, options)
            .await?
            .0)
    }

    pub async fn get<T: Resolve>(
        &self,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<T> {
        self.request(Method::Get, path, params, options).await
    }

    pub async fn post<T: Resolve>(
        &self,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<T> {
        self.request(Method::Post, path, params, options).await
    }

    pub async fn delete<T: Resolve>(
        &self,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<T> {
        self.request(Method::Delete, path, params, options).await
    }
}

/// `/v1/charges` + `ch_1` -> `/v1/charges/ch_1`, rejecting IDs that would
/// change the path.
pub(crate) fn resource_path(base: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() || id.contains(['/', '?', '#']) {
        return Err(Error::validation_with_context(
            "resource id must be non-empty and path-safe",
            ErrorContext::new()
                .with_field_path("id")
                .with_details(id.to_string())
                .with_source("client"),
        ));
    }
    Ok(format!("{}/{}", base, id))
}
