//! In-process transport that replays a fixed script and records every request.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stripe_rust::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use stripe_rust::StripeClient;

pub enum Step {
    Respond(HttpResponse),
    Fail(TransportError),
    /// Respond only after sleeping.
    Slow(Duration, HttpResponse),
}

#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(resp)) => Ok(resp),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Slow(delay, resp)) => {
                tokio::time::sleep(delay).await;
                Ok(resp)
            }
            None => Err(TransportError::Other("script exhausted".into())),
        }
    }
}

pub fn json_response(status: u16, body: Value) -> Step {
    Step::Respond(HttpResponse::new(status, body.to_string()).with_header("Request-Id", "req_scripted"))
}

pub fn error_response(status: u16, error_type: &str, message: &str) -> Step {
    json_response(
        status,
        json!({"error": {"type": error_type, "message": message}}),
    )
}

/// A list page of charges with the given IDs.
pub fn charge_page(ids: &[&str], has_more: bool) -> Step {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "object": "charge", "amount": 100}))
        .collect();
    json_response(
        200,
        json!({"object": "list", "url": "/v1/charges", "data": data, "has_more": has_more}),
    )
}

pub fn client_with(transport: Arc<ScriptedTransport>, max_retries: u32) -> StripeClient {
    client_with_delays(transport, max_retries, Duration::from_millis(1), Duration::from_millis(5))
}

pub fn client_with_delays(
    transport: Arc<ScriptedTransport>,
    max_retries: u32,
    initial: Duration,
    max: Duration,
) -> StripeClient {
    StripeClient::builder()
        .ignore_env()
        .api_key("sk_test_123")
        .max_network_retries(max_retries)
        .retry_delays(initial, max)
        .transport(transport)
        .build()
        .expect("client builds")
}

/// Value of a query parameter in a recorded request URL.
pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
    let url = url::Url::parse(&request.url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
