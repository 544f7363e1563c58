//! Mock HTTP server setup for integration tests

use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use stripe_rust::StripeClient;
use tokio::sync::Mutex;

pub const TEST_KEY: &str = "sk_test_123";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server, isolated from `STRIPE_*` env vars.
    pub fn create_test_client(&self, max_retries: u32) -> stripe_rust::Result<StripeClient> {
        StripeClient::builder()
            .ignore_env()
            .api_key(TEST_KEY)
            .base_url_override(&self.base_url)
            .max_network_retries(max_retries)
            .retry_delays(Duration::from_millis(1), Duration::from_millis(5))
            .build()
    }

    /// Mock a JSON response for `method path`, expected `hits` times.
    pub async fn mock_json(
        &self,
        method: &str,
        path: &str,
        status: usize,
        body: &str,
        hits: usize,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_header("request-id", "req_mock")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }
}
