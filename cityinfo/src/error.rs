//! Error types for cityinfo.
//!
//! Two layers:
//! - [`LlmError`]: a transport-level failure talking to the inference server
//!   (connection refused, timeout, non-success status, undecodable envelope).
//! - [`ResponseError`]: what a city lookup surfaces to its caller. It is tagged
//!   with a [`ResponseErrorKind`] and keeps the underlying cause reachable
//!   through [`std::error::Error::source`].

use std::fmt;

/// Result type alias for cityinfo operations.
pub type Result<T, E = ResponseError> = std::result::Result<T, E>;

/// Boxed error used as the underlying cause of a [`ResponseError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for inference provider operations.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmError {
    /// The error kind.
    pub kind: LlmErrorKind,
    /// The provider name (e.g., "ollama").
    pub provider: Option<String>,
    /// Additional error message.
    pub message: String,
    /// Optional error code (HTTP status or provider code).
    pub code: Option<String>,
}

/// Categories of provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LlmErrorKind {
    /// Network or connection error.
    Network,
    /// Non-success HTTP status without a provider error body.
    HttpStatus,
    /// Error reported by the provider itself.
    Provider,
    /// The provider replied with an envelope that could not be decoded.
    ResponseFormat,
    /// Internal error (client construction, exhausted mocks, ...).
    Internal,
}

impl LlmError {
    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Network,
            provider: None,
            message: message.into(),
            code: None,
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::HttpStatus,
            provider: None,
            message: format!("HTTP {status}: {}", body.into()),
            code: Some(status.to_string()),
        }
    }

    /// Create a provider-specific error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Provider,
            provider: Some(provider.into()),
            message: message.into(),
            code: None,
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ResponseFormat,
            provider: None,
            message: format!("Expected {}, got {}", expected.into(), got.into()),
            code: None,
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Internal,
            provider: None,
            message: message.into(),
            code: None,
        }
    }

    /// Check if a caller could reasonably try again.
    ///
    /// Nothing in this crate retries; the hint is for callers that want to.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, LlmErrorKind::Network)
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Failure class of a [`ResponseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ResponseErrorKind {
    /// The reply carried no usable text content.
    InvalidResponseStructure,
    /// The text content was not a JSON object of the expected shape.
    ParseFailure,
    /// The request itself failed in transport.
    RequestFailure,
}

impl ResponseErrorKind {
    /// Stable label for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidResponseStructure => "InvalidResponseStructure",
            Self::ParseFailure => "ParseFailure",
            Self::RequestFailure => "RequestFailure",
        }
    }
}

impl fmt::Display for ResponseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a city lookup.
#[derive(Debug, thiserror::Error)]
#[error("[{kind}] {message}")]
#[non_exhaustive]
pub struct ResponseError {
    /// Failure class.
    pub kind: ResponseErrorKind,
    /// Human-readable description.
    pub message: String,
    /// City being queried, when known.
    pub city: Option<String>,
    /// What the server or model actually sent back, when there was anything.
    pub raw: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl ResponseError {
    /// The reply had no message or an empty content string.
    ///
    /// `raw` is the serialized reply envelope.
    #[must_use]
    pub fn invalid_structure(raw: impl Into<String>) -> Self {
        Self {
            kind: ResponseErrorKind::InvalidResponseStructure,
            message: "response did not contain any text content".to_owned(),
            city: None,
            raw: Some(raw.into()),
            source: None,
        }
    }

    /// The model's text could not be decoded as a city object.
    #[must_use]
    pub fn parse_failure(err: serde_json::Error, raw: impl Into<String>) -> Self {
        Self {
            kind: ResponseErrorKind::ParseFailure,
            message: format!("model output is not a valid city object: {err}"),
            city: None,
            raw: Some(raw.into()),
            source: Some(Box::new(err)),
        }
    }

    /// The request for `city` failed before any reply was available.
    #[must_use]
    pub fn request_failure(city: impl Into<String>, err: LlmError) -> Self {
        let city = city.into();
        Self {
            kind: ResponseErrorKind::RequestFailure,
            message: format!("request for city '{city}' failed: {err}"),
            city: Some(city),
            raw: None,
            source: Some(Box::new(err)),
        }
    }

    /// Attach the city that was being queried.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Label of the failure class, e.g. `"ParseFailure"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Underlying transport error, for [`ResponseErrorKind::RequestFailure`].
    #[must_use]
    pub fn llm_error(&self) -> Option<&LlmError> {
        self.source.as_deref()?.downcast_ref()
    }

    /// Underlying decode error, for [`ResponseErrorKind::ParseFailure`].
    #[must_use]
    pub fn json_error(&self) -> Option<&serde_json::Error> {
        self.source.as_deref()?.downcast_ref()
    }
}
