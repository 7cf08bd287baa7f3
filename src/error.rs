//! Error types for the gplay client.
//!
//! Two layers live here. [`ApiError`] is the internal failure type every module
//! returns. [`ClassifiedError`] is the closed taxonomy surfaced in the output
//! envelope; only [`crate::classify`] turns the former into the latter.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Internal failures raised by commands, the HTTP client, config and rendering.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No access token configured")]
    MissingCredentials,

    #[error("Upstream returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Output format '{format}' is not supported by '{command}'")]
    UnsupportedFormat { format: String, command: String },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Render(err.to_string())
    }
}

/// Taxonomy codes. `Success` exists only for exit-code mapping; it never
/// appears inside a [`ClassifiedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    GeneralError,
    AuthFailure,
    PermissionDenied,
    ValidationError,
    RateLimited,
    NetworkError,
    NotFound,
    Conflict,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Success,
        ErrorCode::GeneralError,
        ErrorCode::AuthFailure,
        ErrorCode::PermissionDenied,
        ErrorCode::ValidationError,
        ErrorCode::RateLimited,
        ErrorCode::NetworkError,
        ErrorCode::NotFound,
        ErrorCode::Conflict,
    ];

    /// Wire name used in the envelope's `error.code`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::GeneralError => "GENERAL_ERROR",
            ErrorCode::AuthFailure => "AUTH_FAILURE",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn parse(code: &str) -> Option<ErrorCode> {
        ErrorCode::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Payload shared by every classified error variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub http_status: Option<u16>,
    pub details: Option<Map<String, Value>>,
    pub hint: Option<String>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// An error reduced to the fixed taxonomy. One variant per failing code.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedError {
    General(ErrorBody),
    AuthFailure(ErrorBody),
    PermissionDenied(ErrorBody),
    Validation(ErrorBody),
    RateLimited(ErrorBody),
    Network(ErrorBody),
    NotFound(ErrorBody),
    Conflict(ErrorBody),
}

impl ClassifiedError {
    pub fn general(message: impl Into<String>) -> Self {
        ClassifiedError::General(ErrorBody::new(message))
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        ClassifiedError::AuthFailure(ErrorBody::new(message))
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ClassifiedError::PermissionDenied(ErrorBody::new(message))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClassifiedError::Validation(ErrorBody::new(message))
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        ClassifiedError::RateLimited(ErrorBody::new(message))
    }

    pub fn network(message: impl Into<String>) -> Self {
        ClassifiedError::Network(ErrorBody::new(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ClassifiedError::NotFound(ErrorBody::new(message))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ClassifiedError::Conflict(ErrorBody::new(message))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ClassifiedError::General(_) => ErrorCode::GeneralError,
            ClassifiedError::AuthFailure(_) => ErrorCode::AuthFailure,
            ClassifiedError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            ClassifiedError::Validation(_) => ErrorCode::ValidationError,
            ClassifiedError::RateLimited(_) => ErrorCode::RateLimited,
            ClassifiedError::Network(_) => ErrorCode::NetworkError,
            ClassifiedError::NotFound(_) => ErrorCode::NotFound,
            ClassifiedError::Conflict(_) => ErrorCode::Conflict,
        }
    }

    pub fn body(&self) -> &ErrorBody {
        match self {
            ClassifiedError::General(b)
            | ClassifiedError::AuthFailure(b)
            | ClassifiedError::PermissionDenied(b)
            | ClassifiedError::Validation(b)
            | ClassifiedError::RateLimited(b)
            | ClassifiedError::Network(b)
            | ClassifiedError::NotFound(b)
            | ClassifiedError::Conflict(b) => b,
        }
    }

    fn body_mut(&mut self) -> &mut ErrorBody {
        match self {
            ClassifiedError::General(b)
            | ClassifiedError::AuthFailure(b)
            | ClassifiedError::PermissionDenied(b)
            | ClassifiedError::Validation(b)
            | ClassifiedError::RateLimited(b)
            | ClassifiedError::Network(b)
            | ClassifiedError::NotFound(b)
            | ClassifiedError::Conflict(b) => b,
        }
    }

    pub fn message(&self) -> &str {
        &self.body().message
    }

    pub fn hint(&self) -> Option<&str> {
        self.body().hint.as_deref()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.body().http_status
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.body_mut().hint = Some(hint.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.body_mut().http_status = Some(status);
        self
    }

    /// Add one machine-readable entry to `details`.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body_mut()
            .details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl Serialize for ClassifiedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = self.body();
        let len = if body.http_status.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("code", &self.code())?;
        map.serialize_entry("message", &body.message)?;
        map.serialize_entry("details", &body.details)?;
        map.serialize_entry("hint", &body.hint)?;
        if let Some(status) = body.http_status {
            map.serialize_entry("httpStatus", &status)?;
        }
        map.end()
    }
}
