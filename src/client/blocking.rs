//! Synchronous facade over [`StripeClient`].

use crate::client::core::StripeClient;
use crate::client::builder::StripeClientBuilder;
use crate::{Error, ErrorContext, Result};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// Drives an async [`StripeClient`] on a private current-thread runtime.
///
/// Must not be used from inside another tokio runtime.
pub struct BlockingClient {
    runtime: Runtime,
    client: StripeClient,
}

impl BlockingClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_builder(StripeClientBuilder::new().api_key(api_key))
    }

    pub fn from_builder(builder: StripeClientBuilder) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("cannot start runtime: {}", e),
                    ErrorContext::new().with_source("blocking"),
                )
            })?;
        let client = builder.build()?;
        Ok(Self { runtime, client })
    }

    pub fn client(&self) -> &StripeClient {
        &self.client
    }

    /// Run one async operation to completion.
    ///
    /// ```rust,no_run
    /// # fn main() -> stripe_rust::Result<()> {
    /// use stripe_rust::client::BlockingClient;
    /// use stripe_rust::client::RequestOptions;
    ///
    /// let stripe = BlockingClient::new("sk_test_123")?;
    /// let charge = stripe.call(|c| async move {
    ///     c.charges().retrieve("ch_1", &RequestOptions::new()).await
    /// })?;
    /// println!("{}", charge.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn call<'a, F, Fut, T>(&'a self, f: F) -> Result<T>
    where
        F: FnOnce(&'a StripeClient) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        self.runtime.block_on(f(&self.client))
    }
}
