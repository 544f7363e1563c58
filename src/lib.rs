//! # stripe-rust
//!
//! 支付领域 REST API 的强类型客户端：请求编码、鉴权与幂等、重试、响应解码与分页。
//!
//! Typed client for a versioned payments REST API.
//!
//! ## Overview
//!
//! Every resource call goes through the same engine:
//!
//! 1. typed options are encoded into a flat form parameter set ([`codec`]);
//! 2. authentication, the pinned API version, the connected account and an
//!    idempotency key are attached ([`client::RequestContext`]);
//! 3. the request is sent through a [`transport::Transport`], retried per
//!    [`client::RetryPolicy`] with the *same* encoded body and key;
//! 4. the response is decoded into a typed entity or mapped to an [`Error`];
//! 5. list endpoints can be walked page by page as a lazy stream
//!    ([`pagination`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use stripe_rust::client::{RequestOptions, StripeClient};
//! use stripe_rust::resources::{ChargeCreateOptions, ChargeListOptions};
//!
//! #[tokio::main]
//! async fn main() -> stripe_rust::Result<()> {
//!     let client = StripeClient::new("sk_test_123")?;
//!
//!     let charge = client
//!         .charges()
//!         .create(
//!             &ChargeCreateOptions::new(1000, "usd").source("tok_visa"),
//!             &RequestOptions::new().idempotency_key("order-42"),
//!         )
//!         .await?;
//!     println!("created {}", charge.id);
//!
//!     let mut all = client
//!         .charges()
//!         .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())?
//!         .stream();
//!     while let Some(charge) = all.try_next().await? {
//!         println!("{} {}", charge.id, charge.amount);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, request context, retry policy |
//! | [`codec`] | Form encoding rules and JSON decoding helpers |
//! | [`config`] | Layered configuration (defaults, YAML, env, builder) |
//! | [`error`] | Error type and API error details |
//! | [`error_kind`] | Error taxonomy and retryability |
//! | [`pagination`] | Cursor pagination as a lazy stream |
//! | [`resources`] | Charges, subscriptions, balance transactions, payment sources |
//! | [`transport`] | Transport trait and the default HTTP implementation |
//! | [`types`] | Entity traits, lists and the fallback entity |

pub mod client;
pub mod codec;
pub mod config;
pub mod error_kind;
pub mod pagination;
pub mod resources;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{CallStats, CancelHandle, RequestOptions, StripeClient, StripeClientBuilder};
pub use error_kind::ErrorKind;
pub use pagination::{ListOptions, Paginator};
pub use types::{List, Object};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{ApiError, Error, ErrorContext};
