use tokio_util::sync::CancellationToken;

/// Per-call facts for observability: how many attempts were made, with which
/// idempotency key, and what the server reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStats {
    pub method: String,
    pub path: String,
    pub http_status: u16,
    /// Attempts beyond the first.
    pub retry_count: u32,
    pub duration_ms: u128,
    /// Key sent on every attempt of a mutating call.
    pub idempotency_key: Option<String>,
    /// `Request-Id` of the final response.
    pub request_id: Option<String>,
}

/// Cancels an in-flight call and every retry still pending for it.
///
/// Cloning yields a handle to the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
