//! Per-call request context: credentials, pinned version, connected account
//! and idempotency identity.

use crate::client::types::CancelHandle;
use crate::config::{redact, ClientConfig};
use crate::transport::Method;
use crate::{Error, ErrorContext, Result};
use std::fmt;
use uuid::Uuid;

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_VERSION: &str = "Stripe-Version";
pub const HEADER_ACCOUNT: &str = "Stripe-Account";
pub const HEADER_IDEMPOTENCY_KEY: &str = "Idempotency-Key";

/// The API rejects longer keys.
const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

const USER_AGENT: &str = concat!("stripe-rust/", env!("CARGO_PKG_VERSION"));

/// Per-call overrides of the client configuration.
///
/// The API version is deliberately absent: it is pinned per client.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub(crate) api_key: Option<String>,
    pub(crate) stripe_account: Option<String>,
    pub(crate) idempotency_key: Option<String>,
    pub(crate) cancel: Option<CancelHandle>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different secret key for this call only.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Act on behalf of a connected account.
    pub fn stripe_account(mut self, account: impl Into<String>) -> Self {
        self.stripe_account = Some(account.into());
        self
    }

    /// Reuse a caller-chosen idempotency key. It is sent verbatim on every attempt.
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Abort the call (and any pending retries) when `handle` is cancelled.
    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .field("stripe_account", &self.stripe_account)
            .field("idempotency_key", &self.idempotency_key)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Identity of one logical call, fixed before the first attempt.
///
/// Every retry of the call is sent with exactly these headers; in particular
/// the idempotency key is never regenerated between attempts.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestContext {
    api_key: String,
    api_version: String,
    stripe_account: Option<String>,
    idempotency_key: Option<String>,
}

impl RequestContext {
    /// Merge client config with per-call options.
    ///
    /// Mutating methods always end up with an idempotency key: the caller's
    /// if given, otherwise a freshly generated UUID.
    pub fn resolve(config: &ClientConfig, options: &RequestOptions, method: Method) -> Result<Self> {
        let api_key = options
            .api_key
            .clone()
            .unwrap_or_else(|| config.api_key().to_string());
        if api_key.trim().is_empty() {
            return Err(Error::validation_with_context(
                "per-request API key must not be empty",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("request_context"),
            ));
        }

        validate_header_value("api_key", &api_key)?;
        let stripe_account = options
            .stripe_account
            .clone()
            .or_else(|| config.stripe_account().map(str::to_string));
        if let Some(account) = &stripe_account {
            validate_header_value("stripe_account", account)?;
        }

        let idempotency_key = match &options.idempotency_key {
            Some(key) => {
                validate_idempotency_key(key)?;
                Some(key.clone())
            }
            None if method.is_mutating() => Some(Uuid::new_v4().to_string()),
            None => None,
        };

        Ok(Self {
            api_key,
            api_version: config.api_version().to_string(),
            stripe_account,
            idempotency_key,
        })
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn stripe_account(&self) -> Option<&str> {
        self.stripe_account.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Header set for one attempt of this call.
    pub fn headers(&self, method: Method) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                HEADER_AUTHORIZATION.to_string(),
                format!("Bearer {}", self.api_key),
            ),
            (HEADER_VERSION.to_string(), self.api_version.clone()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if method == Method::Post {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        }
        if let Some(account) = &self.stripe_account {
            headers.push((HEADER_ACCOUNT.to_string(), account.clone()));
        }
        if let Some(key) = &self.idempotency_key {
            headers.push((HEADER_IDEMPOTENCY_KEY.to_string(), key.clone()));
        }
        headers
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("api_key", &redact(&self.api_key))
            .field("api_version", &self.api_version)
            .field("stripe_account", &self.stripe_account)
            .field("idempotency_key", &self.idempotency_key)
            .finish()
    }
}

/// Header values may not carry control characters such as CR or LF.
fn validate_header_value(field: &str, value: &str) -> Result<()> {
    if value.chars().any(|c| c.is_control() && c != '\t') {
        return Err(Error::validation_with_context(
            "header value contains control characters",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("request_context"),
        ));
    }
    Ok(())
}

fn validate_idempotency_key(key: &str) -> Result<()> {
    validate_header_value("idempotency_key", key)?;
    if key.trim().is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(Error::validation_with_context(
            format!(
                "idempotency key must be 1..={} characters",
                MAX_IDEMPOTENCY_KEY_LEN
            ),
            ErrorContext::new()
                .with_field_path("idempotency_key")
                .with_source("request_context"),
        ));
    }
    Ok(())
}
