use crate::error_kind::ErrorKind;
use crate::transport::TransportError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "tax_percent", "list.limit")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected shape, offending value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "codec", "resolver", "paginator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// An error reported by the remote API.
///
/// Fields are private: once mapped from a response the error is immutable and
/// only exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    http_status: u16,
    kind: ErrorKind,
    error_type: Option<String>,
    message: String,
    code: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
    charge: Option<String>,
    doc_url: Option<String>,
    request_id: Option<String>,
    retry_after: Option<Duration>,
    should_retry: Option<bool>,
}

/// Raw fields an [`ApiError`] is assembled from.
#[derive(Debug, Clone, Default)]
pub(crate) struct ApiErrorParts {
    pub error_type: Option<String>,
    pub message: String,
    pub code: Option<String>,
    pub param: Option<String>,
    pub decline_code: Option<String>,
    pub charge: Option<String>,
    pub doc_url: Option<String>,
    pub request_id: Option<String>,
    pub retry_after: Option<Duration>,
    pub should_retry: Option<bool>,
}

impl ApiError {
    pub(crate) fn from_parts(http_status: u16, kind: ErrorKind, parts: ApiErrorParts) -> Self {
        Self {
            http_status,
            kind,
            error_type: parts.error_type,
            message: parts.message,
            code: parts.code,
            param: parts.param,
            decline_code: parts.decline_code,
            charge: parts.charge,
            doc_url: parts.doc_url,
            request_id: parts.request_id,
            retry_after: parts.retry_after,
            should_retry: parts.should_retry,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The raw `error.type` from the body, if any.
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Issuer decline reason; only set for card errors.
    pub fn decline_code(&self) -> Option<&str> {
        self.decline_code.as_deref()
    }

    /// ID of the failed charge, for card errors on charge creation.
    pub fn charge(&self) -> Option<&str> {
        self.charge.as_deref()
    }

    pub fn doc_url(&self) -> Option<&str> {
        self.doc_url.as_deref()
    }

    /// Value of the `Request-Id` response header.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Server-provided `Retry-After` hint.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Server-provided `Stripe-Should-Retry` hint.
    pub fn should_retry(&self) -> Option<bool> {
        self.should_retry
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} ({}): {}", self.http_status, self.kind, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [code: {}]", code)?;
        }
        if let Some(decline) = &self.decline_code {
            write!(f, " [decline_code: {}]", decline)?;
        }
        if let Some(param) = &self.param {
            write!(f, " [param: {}]", param)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Unified error type for the client.
/// Every failure, local or remote, ends up in one of these categories.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid options: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Failed to decode response (HTTP {status}): {message}{}", format_context(.context))]
    Decode {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Pagination protocol violation: {message}{}", format_context(.context))]
    Pagination {
        message: String,
        context: ErrorContext,
    },

    #[error("Request cancelled")]
    Cancelled,
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub(crate) fn decode_with_context(
        status: u16,
        msg: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Error::Decode {
            status,
            message: msg.into(),
            context,
        }
    }

    pub(crate) fn pagination_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Pagination {
            message: msg.into(),
            context,
        }
    }

    /// Position of this error in the API error taxonomy.
    ///
    /// `Configuration` and `Cancelled` never reach the server and have no kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api(e) => Some(e.kind()),
            Error::Transport(TransportError::InvalidRequest(_)) => Some(ErrorKind::InvalidRequest),
            Error::Transport(_) => Some(ErrorKind::Network),
            Error::Validation { .. } => Some(ErrorKind::InvalidRequest),
            Error::Decode { .. } => Some(ErrorKind::Decode),
            Error::Pagination { .. } => Some(ErrorKind::Api),
            Error::Configuration { .. } | Error::Cancelled => None,
        }
    }

    /// The remote error, if this failure came from an API response.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the response that caused this error, if there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.http_status()),
            Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Configuration { context, .. }
            | Error::Decode { context, .. }
            | Error::Pagination { context, .. } => Some(context),
            _ => None,
        }
    }
}
