//! Client configuration.
//!
//! A [`ClientConfig`] is resolved once, when the client is built, and is
//! immutable afterwards. It is assembled from layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. `STRIPE_*` environment variables
//! 4. explicit builder setters
//!
//! ```yaml
//! api_key: sk_test_123
//! api_version: "2018-02-28"
//! max_network_retries: 3
//! timeout_secs: 30
//! ```

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
/// API version every request is pinned to unless configured otherwise.
pub const DEFAULT_API_VERSION: &str = "2018-02-28";
pub const DEFAULT_MAX_NETWORK_RETRIES: u32 = 2;
/// Upper bound on configurable retries.
pub const MAX_NETWORK_RETRIES: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);
pub const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Immutable settings shared by every call made through one client.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) api_version: String,
    pub(crate) api_base: Url,
    pub(crate) stripe_account: Option<String>,
    pub(crate) max_network_retries: u32,
    pub(crate) timeout: Duration,
    pub(crate) initial_retry_delay: Duration,
    pub(crate) max_retry_delay: Duration,
    pub(crate) proxy_url: Option<String>,
    pub(crate) pool_max_idle_per_host: usize,
}

impl ClientConfig {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Connected account used when a call does not name one.
    pub fn stripe_account(&self) -> Option<&str> {
        self.stripe_account.as_deref()
    }

    pub fn max_network_retries(&self) -> u32 {
        self.max_network_retries
    }

    /// Timeout applied to each attempt, not to the logical call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn initial_retry_delay(&self) -> Duration {
        self.initial_retry_delay
    }

    pub fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    pub fn pool_max_idle_per_host(&self) -> usize {
        self.pool_max_idle_per_host
    }

    /// Parse a YAML document into a standalone config (no env, no defaults for the key).
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        ConfigLayer::from_yaml_str(yaml)?.resolve()
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        ConfigLayer::from_yaml_file(path)?.resolve()
    }

    /// Join an API path (e.g. `/v1/charges`) onto the configured base.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.api_base.as_str().trim_end_matches('/'), path)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_version", &self.api_version)
            .field("api_base", &self.api_base.as_str())
            .field("stripe_account", &self.stripe_account)
            .field("max_network_retries", &self.max_network_retries)
            .field("timeout", &self.timeout)
            .field("initial_retry_delay", &self.initial_retry_delay)
            .field("max_retry_delay", &self.max_retry_delay)
            .field("proxy_url", &self.proxy_url)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

/// Keep the key prefix (`sk_test_`, `rk_live_`, ...) and hide the secret.
pub(crate) fn redact(key: &str) -> String {
    match key.rfind('_') {
        Some(idx) if idx + 1 < key.len() => format!("{}****", &key[..=idx]),
        _ => "****".to_string(),
    }
}

/// One partial source of configuration. Unset fields defer to earlier layers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub api_base: Option<String>,
    pub stripe_account: Option<String>,
    pub max_network_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub initial_retry_delay_ms: Option<u64>,
    pub max_retry_delay_ms: Option<u64>,
    pub proxy_url: Option<String>,
    pub pool_max_idle_per_host: Option<usize>,
}

impl ConfigLayer {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config file: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Read `STRIPE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigLayer::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: var("STRIPE_API_KEY"),
            api_version: var("STRIPE_API_VERSION"),
            api_base: var("STRIPE_API_BASE"),
            stripe_account: var("STRIPE_ACCOUNT"),
            max_network_retries: var("STRIPE_MAX_NETWORK_RETRIES").and_then(|s| s.parse().ok()),
            timeout_secs: var("STRIPE_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()),
            initial_retry_delay_ms: None,
            max_retry_delay_ms: None,
            proxy_url: var("STRIPE_PROXY_URL"),
            pool_max_idle_per_host: var("STRIPE_HTTP_POOL_MAX_IDLE_PER_HOST")
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ConfigLayer) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            api_version: other.api_version.or(self.api_version),
            api_base: other.api_base.or(self.api_base),
            stripe_account: other.stripe_account.or(self.stripe_account),
            max_network_retries: other.max_network_retries.or(self.max_network_retries),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            initial_retry_delay_ms: other.initial_retry_delay_ms.or(self.initial_retry_delay_ms),
            max_retry_delay_ms: other.max_retry_delay_ms.or(self.max_retry_delay_ms),
            proxy_url: other.proxy_url.or(self.proxy_url),
            pool_max_idle_per_host: other.pool_max_idle_per_host.or(self.pool_max_idle_per_host),
        }
    }

    /// Fill the remaining gaps with defaults and validate.
    pub fn resolve(self) -> Result<ClientConfig> {
        let api_key = self.api_key.map(|k| k.trim().to_string()).unwrap_or_default();
        if api_key.is_empty() {
            return Err(Error::configuration_with_context(
                "API key required (set STRIPE_API_KEY or call api_key())",
                ErrorContext::new().with_field_path("api_key").with_source("config"),
            ));
        }
        if api_key.chars().any(char::is_whitespace) {
            return Err(Error::configuration_with_context(
                "API key must not contain whitespace",
                ErrorContext::new().with_field_path("api_key").with_source("config"),
            ));
        }

        let raw_base = self.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&raw_base).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid api_base: {}", e),
                ErrorContext::new()
                    .with_field_path("api_base")
                    .with_details(raw_base.clone())
                    .with_source("config"),
            )
        })?;

        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs()));
        if timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeout must be positive",
                ErrorContext::new().with_field_path("timeout_secs").with_source("config"),
            ));
        }

        let initial_retry_delay = self
            .initial_retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INITIAL_RETRY_DELAY);
        let max_retry_delay = self
            .max_retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MAX_RETRY_DELAY)
            .max(initial_retry_delay);

        Ok(ClientConfig {
            api_key,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_base,
            stripe_account: self.stripe_account,
            max_network_retries: self
                .max_network_retries
                .unwrap_or(DEFAULT_MAX_NETWORK_RETRIES)
                .min(MAX_NETWORK_RETRIES),
            timeout,
            initial_retry_delay,
            max_retry_delay,
            proxy_url: self.proxy_url,
            pool_max_idle_per_host: self.pool_max_idle_per_host.unwrap_or(32),
        })
    }
}
