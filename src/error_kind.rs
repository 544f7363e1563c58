//! 错误分类：API 错误类型及其重试语义。
//!
//! Error taxonomy for API calls.
//!
//! Every failure surfaced by the client maps onto one [`ErrorKind`]. The kind is
//! derived from the machine-readable `type` field in the error body when the
//! server provides one, and from the HTTP status otherwise.
//!
//! | Kind                   | Trigger                              | Retried |
//! |------------------------|--------------------------------------|---------|
//! | `InvalidRequest`       | 400-class, bad or missing parameters | no      |
//! | `Authentication`       | 401                                  | no      |
//! | `Permission`           | 403                                  | no      |
//! | `NotFound`             | 404                                  | no      |
//! | `CardDeclined`         | 402 / `card_error`                   | no      |
//! | `RateLimited`          | 429                                  | yes     |
//! | `Api`                  | 5xx, unrecognized error types        | yes     |
//! | `Network`              | transport-level failure              | yes     |
//! | `IdempotencyConflict`  | key replayed with other parameters   | no      |
//! | `Decode`               | malformed success body               | no      |
//!
//! ## Example
//!
//! ```rust
//! use stripe_rust::error_kind::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(429);
//! assert_eq!(kind, ErrorKind::RateLimited);
//! assert!(kind.retryable());
//! assert_eq!(kind.category(), "rate");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request, invalid parameters, or missing required fields
    InvalidRequest,
    /// Invalid, expired, or missing API key
    Authentication,
    /// Valid credentials but insufficient permissions
    Permission,
    /// Requested resource does not exist
    NotFound,
    /// The card or payment method was declined
    CardDeclined,
    /// Too many requests hit the API too quickly
    RateLimited,
    /// Something went wrong on the server side
    Api,
    /// The request never produced an HTTP response
    Network,
    /// Idempotency key reused with different parameters
    IdempotencyConflict,
    /// A success response could not be decoded
    Decode,
}

impl ErrorKind {
    /// Returns the wire name of the kind (e.g., `"invalid_request_error"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request_error",
            Self::Authentication => "authentication_error",
            Self::Permission => "permission_error",
            Self::NotFound => "not_found",
            Self::CardDeclined => "card_error",
            Self::RateLimited => "rate_limit_error",
            Self::Api => "api_error",
            Self::Network => "network_error",
            Self::IdempotencyConflict => "idempotency_error",
            Self::Decode => "decode_error",
        }
    }

    /// Returns whether this kind of failure may be retried by default.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Api | Self::Network)
    }

    /// Returns the category: `"client"`, `"payment"`, `"rate"`, `"server"`, or `"operational"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest | Self::Authentication | Self::Permission | Self::NotFound => {
                "client"
            }
            Self::CardDeclined => "payment",
            Self::RateLimited => "rate",
            Self::Api | Self::Network => "server",
            Self::IdempotencyConflict | Self::Decode => "operational",
        }
    }

    /// Maps the `error.type` string from an error body.
    ///
    /// Only types that decide the kind on their own are recognized here;
    /// `invalid_request_error` and `api_error` defer to the HTTP status.
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        let kind = match error_type {
            "card_error" => Self::CardDeclined,
            "idempotency_error" => Self::IdempotencyConflict,
            "authentication_error" => Self::Authentication,
            "permission_error" => Self::Permission,
            "rate_limit_error" => Self::RateLimited,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps an HTTP status code to the most likely kind.
    ///
    /// Unknown 4xx statuses are treated as invalid requests; everything else is
    /// a generic API error.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            402 => Self::CardDeclined,
            403 => Self::Permission,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            400..=499 => Self::InvalidRequest,
            _ => Self::Api,
        }
    }

    /// Classifies an error response by its body `type` first, then its status.
    ///
    /// A `type` nobody recognizes never lands in the generic 4xx bucket: it is
    /// reported as [`ErrorKind::Api`] unless the status alone is specific.
    pub fn classify(status: u16, error_type: Option<&str>) -> Self {
        if let Some(kind) = error_type.and_then(Self::from_error_type) {
            return kind;
        }
        let kind = Self::from_http_status(status);
        match error_type {
            Some(t) if kind == Self::InvalidRequest && !Self::is_status_deferred(t) => Self::Api,
            _ => kind,
        }
    }

    fn is_status_deferred(error_type: &str) -> bool {
        matches!(
            error_type,
            "invalid_request_error" | "api_error" | "api_connection_error"
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
