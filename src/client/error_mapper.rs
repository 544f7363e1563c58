//! Error response mapping

use crate::error::{ApiError, ApiErrorParts};
use crate::error_kind::ErrorKind;
use crate::transport::HttpResponse;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
    code: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
    charge: Option<String>,
    doc_url: Option<String>,
}

/// Map a non-2xx response to a typed [`ApiError`].
///
/// Never fails: a body that is not the documented error envelope still yields
/// an error classified by status, with the raw body as message.
pub(crate) fn map_error(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let body = match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => envelope.error,
        Err(_) => ErrorBody {
            message: Some(crate::codec::body_excerpt(&response.body)),
            ..Default::default()
        },
    };

    let kind = ErrorKind::classify(status, body.error_type.as_deref());

    // Decline details only mean something on card errors.
    let decline_code = if kind == ErrorKind::CardDeclined {
        body.decline_code
    } else {
        None
    };

    let message = body
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {} with no error message", status));

    ApiError::from_parts(
        status,
        kind,
        ApiErrorParts {
            error_type: body.error_type,
            message,
            code: body.code,
            param: body.param,
            decline_code,
            charge: body.charge,
            doc_url: body.doc_url,
            request_id: response.header("request-id").map(str::to_string),
            retry_after: retry_after(response),
            should_retry: should_retry(response),
        },
    )
}

/// `Retry-After: <seconds>`; the HTTP-date form is ignored.
///
/// Values too large for a `Duration` saturate; the policy caps them anyway.
fn retry_after(response: &HttpResponse) -> Option<Duration> {
    let raw = response.header("retry-after")?;
    let secs: f64 = raw.parse().ok()?;
    if secs.is_nan() || secs < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

fn should_retry(response: &HttpResponse) -> Option<bool> {
    match response.header("stripe-should-retry")? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
