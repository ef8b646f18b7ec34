//! Error taxonomy for the OpenF1 client.
//!
//! Every failure surfaced by the workspace is an [`Error`]: a fixed
//! [`ErrorKind`] plus an [`ErrorEnvelope`] with the status code, message,
//! sanitized body snippet and request URL when they are known.

use std::time::Duration;

use crate::security::sanitize_body;

/// Result type alias for openf1-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all OpenF1 operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {}", .envelope.message)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Status, message and body context.
    pub envelope: ErrorEnvelope,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Context carried by every error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,
    /// Human-readable description.
    pub message: String,
    /// Sanitized, truncated response body.
    pub body: Option<String>,
    /// URL of the failed request.
    pub url: Option<String>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            envelope: ErrorEnvelope {
                message: message.into(),
                ..Default::default()
            },
            source: None,
        }
    }

    /// Create a new error with the given kind, message and source.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Shorthand for a decoding error without positional context.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Validation {
                index: None,
                field: None,
            },
            message,
        )
    }

    /// Attach the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.envelope.status = Some(status);
        self
    }

    /// Attach a response body. The body is sanitized and truncated.
    pub fn with_body(mut self, body: &str) -> Self {
        if !body.is_empty() {
            self.envelope.body = Some(sanitize_body(body));
        }
        self
    }

    /// Attach the request URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.envelope.url = Some(url.into());
        self
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns true if this is an authentication or authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth)
    }

    /// Returns true if the remote API reported 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// Returns true if this error was raised before any network activity.
    pub fn is_config_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Config)
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.envelope.status
    }

    /// The error message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.envelope.message
    }

    /// Sanitized response body snippet.
    pub fn body(&self) -> Option<&str> {
        self.envelope.body.as_deref()
    }

    /// URL of the failed request.
    pub fn url(&self) -> Option<&str> {
        self.envelope.url.as_deref()
    }
}

/// The kind of error that occurred.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid client or filter configuration, raised before any network call.
    #[error("Configuration error")]
    Config,

    /// Connection, DNS or TLS failure. No response was received.
    #[error("Transport error")]
    Transport,

    /// The request exceeded the configured timeout.
    #[error("Request timed out{}", timeout.map(|d| format!(" after {:?}", d)).unwrap_or_default())]
    Timeout { timeout: Option<Duration> },

    /// HTTP 401 or 403, or a failed token exchange.
    #[error("Authentication error")]
    Auth,

    /// HTTP 429.
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {:?}", d)).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// HTTP 404.
    #[error("Not found")]
    NotFound,

    /// HTTP 5xx.
    #[error("Server error")]
    Server,

    /// Any other non-2xx status.
    #[error("API error")]
    Api,

    /// The response body does not match the expected shape.
    #[error("Validation error{}", describe_position(*index, field.as_deref()))]
    Validation {
        /// Position of the offending element in a JSON array body.
        index: Option<usize>,
        /// Field or path that failed to decode.
        field: Option<String>,
    },
}

impl ErrorKind {
    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Transport
                | ErrorKind::Timeout { .. }
                | ErrorKind::Server
                | ErrorKind::RateLimited { .. }
        )
    }
}

fn describe_position(index: Option<usize>, field: Option<&str>) -> String {
    match (index, field) {
        (Some(i), Some(f)) => format!(" at element {i}, field '{f}'"),
        (Some(i), None) => format!(" at element {i}"),
        (None, Some(f)) => format!(" in field '{f}'"),
        (None, None) => String::new(),
    }
}

/// Default message for an HTTP status code.
pub fn status_message(status: u16) -> String {
    let known = match status {
        400 => "Bad request",
        401 => "Authentication required",
        403 => "Access forbidden",
        404 => "Resource not found",
        405 => "Method not allowed",
        408 => "Request timeout",
        422 => "Validation error",
        429 => "Rate limit exceeded",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => return format!("HTTP error {status}"),
    };
    known.to_string()
}

/// Map a non-success HTTP status to its taxonomy error.
///
/// Pure function of the status and response context. Callers only invoke it
/// for statuses outside `200..300`.
pub fn classify_status(
    status: u16,
    body: &str,
    url: Option<&str>,
    retry_after: Option<Duration>,
) -> Error {
    let kind = match status {
        401 | 403 => ErrorKind::Auth,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited { retry_after },
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Api,
    };

    let mut err = Error::new(kind, status_message(status))
        .with_status(status)
        .with_body(body);
    if let Some(url) = url {
        err = err.with_url(url);
    }
    err
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string());
        let (kind, message) = if err.is_timeout() {
            (
                ErrorKind::Timeout { timeout: None },
                match &url {
                    Some(u) => format!("Request to {u} timed out"),
                    None => "Request timed out".to_string(),
                },
            )
        } else if err.is_connect() {
            (
                ErrorKind::Transport,
                match &url {
                    Some(u) => format!("Failed to connect to {u}"),
                    None => "Failed to connect".to_string(),
                },
            )
        } else if err.is_builder() {
            (ErrorKind::Config, format!("Invalid request: {err}"))
        } else {
            (
                ErrorKind::Transport,
                match &url {
                    Some(u) => format!("Request to {u} failed"),
                    None => format!("Request failed: {err}"),
                },
            )
        };

        let mut out = Error::with_source(kind, message, err);
        out.envelope.url = url;
        out
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(
            ErrorKind::Validation {
                index: None,
                field: None,
            },
            format!("Invalid JSON: {err}"),
            err,
        )
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config, format!("Invalid URL: {err}"), err)
    }
}
