//! Client for the REST API.
//!
//! Keep the public surface small: a cloneable [`StripeClient`], its builder,
//! per-call [`RequestOptions`], and typed resource services hanging off it.
//! Implementation details are split into submodules under `src/client/`.

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod builder;
pub mod context;
pub mod core;
mod error_mapper;
mod execution;
pub mod policy;
mod resolver;
pub mod types;

#[cfg(feature = "blocking")]
pub use blocking::BlockingClient;
pub use builder::StripeClientBuilder;
pub use context::{RequestContext, RequestOptions};
pub use self::core::StripeClient;
pub use policy::{Decision, RetryPolicy};
pub use resolver::Resolve;
pub use types::{CallStats, CancelHandle};

pub(crate) use self::core::resource_path;
