//! 请求执行逻辑：单次尝试与带重试的调用循环。
//!
//! Request execution: single attempts and the retry loop around them.

use crate::client::context::{RequestContext, RequestOptions};
use crate::client::policy::Decision;
use crate::client::resolver::{resolve, Resolve};
use crate::client::types::{CallStats, CancelHandle};
use crate::codec::Params;
use crate::transport::{HttpRequest, HttpResponse, Method, TransportError};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::core::StripeClient;

impl StripeClient {
    /// Issue a call, retrying per policy, and report per-call stats.
    ///
    /// The parameters are encoded and the idempotency key fixed once, before
    /// the first attempt; every retry re-sends the identical request.
    pub async fn request_with_stats<T: Resolve>(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<(T, CallStats)> {
        let context = RequestContext::resolve(&self.config, options, method)?;
        let request = self.build_request(method, path, params, &context)?;
        let cancel = options.cancel.as_ref();

        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            debug!(
                method = method.as_str(),
                path,
                attempt,
                "stripe-rust request attempt"
            );

            let result = match self.execute_once(request.clone(), cancel).await {
                Ok(resp) => resolve::<T>(&resp).map(|value| (value, resp)),
                Err(e) => Err(e),
            };

            let err = match result {
                Ok((value, resp)) => {
                    let stats = CallStats {
                        method: method.as_str().to_string(),
                        path: path.to_string(),
                        http_status: resp.status,
                        retry_count: attempt,
                        duration_ms: start.elapsed().as_millis(),
                        idempotency_key: context.idempotency_key().map(str::to_string),
                        request_id: resp.header("request-id").map(str::to_string),
                    };
                    return Ok((value, stats));
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => e,
            };

            match self.policy.decide(&err, attempt) {
                Decision::Retry { delay } => {
                    warn!(
                        method = method.as_str(),
                        path,
                        attempt,
                        http_status = err.http_status().unwrap_or(0),
                        delay_ms = delay.as_millis() as u64,
                        "stripe-rust retrying request: {}",
                        err
                    );
                    sleep_or_cancel(delay, cancel).await?;
                    attempt = attempt.saturating_add(1);
                }
                Decision::Fail => {
                    let api = err.as_api_error();
                    info!(
                        method = method.as_str(),
                        path,
                        http_status = err.http_status().unwrap_or(0),
                        error_type = err.kind().map(|k| k.name()).unwrap_or("none"),
                        request_id = api.and_then(|e| e.request_id()).unwrap_or(""),
                        retry_count = attempt,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "stripe-rust request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// One attempt, bounded by the per-attempt timeout and the cancel handle.
    ///
    /// This never retries; the policy loop lives in the caller.
    pub(crate) async fn execute_once(
        &self,
        request: HttpRequest,
        cancel: Option<&CancelHandle>,
    ) -> Result<HttpResponse> {
        if cancel.is_some_and(CancelHandle::is_cancelled) {
            return Err(Error::Cancelled);
        }

        let timeout = self.config.timeout();
        let send = tokio::time::timeout(timeout, self.transport.send(request));
        let outcome = match cancel {
            Some(handle) => tokio::select! {
                biased;
                _ = handle.cancelled() => return Err(Error::Cancelled),
                r = send => r,
            },
            None => send.await,
        };

        match outcome {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(e)) => Err(Error::Transport(e)),
            Err(_) => Err(Error::Transport(TransportError::Timeout(timeout))),
        }
    }

    /// GET and DELETE carry parameters in the query string, POST in a form body.
    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        context: &RequestContext,
    ) -> Result<HttpRequest> {
        let mut url = self.config.url_for(path);
        let encoded = params.to_form_string()?;
        let body = match method {
            Method::Post => Some(encoded),
            Method::Get | Method::Delete => {
                if !encoded.is_empty() {
                    url.push('?');
                    url.push_str(&encoded);
                }
                None
            }
        };
        Ok(HttpRequest {
            method,
            url,
            headers: context.headers(method),
            body,
        })
    }
}

async fn sleep_or_cancel(
    delay: std::time::Duration,
    cancel: Option<&CancelHandle>,
) -> Result<()> {
    match cancel {
        Some(handle) => tokio::select! {
            biased;
            _ = handle.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        },
        None => {
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }
}
