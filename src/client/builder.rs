use crate::client::core::StripeClient;
use crate::client::policy::RetryPolicy;
use crate::config::ConfigLayer;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for [`StripeClient`].
///
/// Settings resolve as defaults < config file < `STRIPE_*` env < the setters
/// below. Nothing is shared between clients built from separate builders.
pub struct StripeClientBuilder {
    explicit: ConfigLayer,
    config_file: Option<PathBuf>,
    read_env: bool,
    transport: Option<Arc<dyn Transport>>,
    retry_policy: Option<RetryPolicy>,
}

impl Default for StripeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StripeClientBuilder {
    pub fn new() -> Self {
        Self {
            explicit: ConfigLayer::default(),
            config_file: None,
            read_env: true,
            transport: None,
            retry_policy: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.explicit.api_key = Some(key.into());
        self
    }

    /// Pin a different API version for every call made by this client.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.explicit.api_version = Some(version.into());
        self
    }

    /// Override base URL (primarily for testing with mock servers)
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.explicit.api_base = Some(base_url.into());
        self
    }

    pub fn stripe_account(mut self, account: impl Into<String>) -> Self {
        self.explicit.stripe_account = Some(account.into());
        self
    }

    /// Retries after the first attempt; capped at [`crate::config::MAX_NETWORK_RETRIES`].
    pub fn max_network_retries(mut self, retries: u32) -> Self {
        self.explicit.max_network_retries = Some(retries);
        self
    }

    /// Per-attempt timeout. Sub-second precision is rounded up to whole seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.explicit.timeout_secs = Some(secs);
        self
    }

    pub fn retry_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.explicit.initial_retry_delay_ms = Some(initial.as_millis() as u64);
        self.explicit.max_retry_delay_ms = Some(max.as_millis() as u64);
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.explicit.proxy_url = Some(url.into());
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.explicit.pool_max_idle_per_host = Some(n);
        self
    }

    /// Load a YAML config file as the lowest non-default layer.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skip `STRIPE_*` environment variables (useful in tests).
    pub fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Replace the HTTP transport, e.g. with a scripted one in tests.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the retry policy derived from config.
    ///
    /// The retry budget is still capped at [`crate::config::MAX_NETWORK_RETRIES`].
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<StripeClient> {
        let mut layer = ConfigLayer::default();
        if let Some(path) = &self.config_file {
            layer = layer.merge(ConfigLayer::from_yaml_file(path)?);
        }
        if self.read_env {
            layer = layer.merge(ConfigLayer::from_env());
        }
        let config = layer.merge(self.explicit).resolve()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&config)?),
        };
        let policy = match self.retry_policy {
            Some(p) => RetryPolicy::new(p.max_retries, p.initial_delay, p.max_delay),
            None => RetryPolicy::from_config(&config),
        };

        debug!(
            api_base = config.api_base().as_str(),
            api_version = config.api_version(),
            max_network_retries = policy.max_retries,
            "stripe-rust client built"
        );

        Ok(StripeClient {
            config: Arc::new(config),
            transport,
            policy: Arc::new(policy),
        })
    }
}
