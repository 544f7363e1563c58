//! Typed resources.
//!
//! Each resource pairs options types (implementing [`crate::codec::FormEncode`])
//! with entity types and a borrowed service obtained from the client:
//!
//! ```rust,no_run
//! use stripe_rust::client::{RequestOptions, StripeClient};
//! use stripe_rust::resources::ChargeCreateOptions;
//!
//! # async fn run() -> stripe_rust::Result<()> {
//! let client = StripeClient::new("sk_test_123")?;
//! let charge = client
//!     .charges()
//!     .create(
//!         &ChargeCreateOptions::new(1000, "usd").source("tok_visa"),
//!         &RequestOptions::new(),
//!     )
//!     .await?;
//! assert_eq!(charge.amount, 1000);
//! # Ok(())
//! # }
//! ```

pub mod balance_transactions;
pub mod charges;
pub mod payment_source;
pub mod shared;
pub mod subscriptions;

pub use balance_transactions::{
    BalanceTransaction, BalanceTransactionListOptions, BalanceTransactionService,
};
pub use charges::{
    Charge, ChargeCaptureOptions, ChargeCreateOptions, ChargeListOptions, ChargeService,
    ChargeUpdateOptions,
};
pub use payment_source::{BankAccount, Card, PaymentSource, Source};
pub use shared::{BaseOptions, CardOptions, DateFilter};
pub use subscriptions::{
    Billing, Plan, Subscription, SubscriptionCancelOptions, SubscriptionCreateOptions,
    SubscriptionItem, SubscriptionItemOptions, SubscriptionListOptions, SubscriptionService,
    SubscriptionSharedOptions, SubscriptionStatus, SubscriptionUpdateOptions,
};
