//! Error classification: any [`ApiError`] becomes exactly one [`ClassifiedError`].
//!
//! Precedence, highest first:
//! 1. a local validation failure recorded in the context (the error is not inspected),
//! 2. the upstream HTTP status, or a transport/timeout failure,
//! 3. authentication-failure patterns in the error text,
//! 4. general error.
//!
//! Classification is pure: no I/O, no retries.

use crate::error::{ApiError, ClassifiedError};

/// Upstream API family a command talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFamily {
    /// Google Play Developer API.
    Publisher,
    /// Play Developer Reporting API (vitals, anomalies).
    Reporting,
    /// No upstream call.
    Local,
}

impl ServiceFamily {
    /// Service name recorded in `meta.services`.
    pub fn service_name(self) -> Option<&'static str> {
        match self {
            ServiceFamily::Publisher => Some("androidpublisher"),
            ServiceFamily::Reporting => Some("playdeveloperreporting"),
            ServiceFamily::Local => None,
        }
    }
}

/// What the classifier knows about the failure site.
#[derive(Debug, Clone)]
pub struct ClassifyContext {
    pub family: ServiceFamily,
    /// Set when the command rejected its input before any network call.
    pub local_validation: Option<String>,
}

impl ClassifyContext {
    pub fn new(family: ServiceFamily) -> Self {
        Self {
            family,
            local_validation: None,
        }
    }

    pub fn with_local_validation(mut self, message: impl Into<String>) -> Self {
        self.local_validation = Some(message.into());
        self
    }
}

const AUTH_FAILURE_PATTERNS: &[&str] = &[
    "invalid_grant",
    "invalid_token",
    "oauth2: cannot fetch token",
    "token has been expired or revoked",
    "failed to refresh",
    "refresh token",
    "request had invalid authentication credentials",
    "unauthenticated",
];

const TOKEN_HINT: &str = "Set GPLAY_ACCESS_TOKEN (or auth.access_token in config.toml) to a valid OAuth access token";
const REPORTING_DISABLED_HINT: &str = "The Play Developer Reporting API may not be enabled for this Google Cloud project; enable it in the Cloud console";

pub fn classify(err: &ApiError, ctx: &ClassifyContext) -> ClassifiedError {
    if let Some(message) = &ctx.local_validation {
        return ClassifiedError::validation(message.clone());
    }

    match err {
        ApiError::Validation(message) => ClassifiedError::validation(message.clone()),
        ApiError::UnsupportedFormat { format, command } => {
            ClassifiedError::validation(err.to_string())
                .with_detail("format", format.clone())
                .with_detail("command", command.clone())
        }
        ApiError::MissingCredentials => {
            ClassifiedError::auth_failure(err.to_string()).with_hint(TOKEN_HINT)
        }
        ApiError::Http { status, message } => classify_status(*status, message, ctx),
        ApiError::Transport(message) | ApiError::Timeout(message) => {
            if matches_auth_pattern(message) {
                ClassifiedError::auth_failure(message.clone()).with_hint(TOKEN_HINT)
            } else {
                ClassifiedError::network(err.to_string())
            }
        }
        ApiError::Io { path, .. } => ClassifiedError::general(err.to_string())
            .with_detail("path", path.display().to_string()),
        ApiError::ConfigError(message) => {
            if matches_auth_pattern(message) {
                ClassifiedError::auth_failure(message.clone()).with_hint(TOKEN_HINT)
            } else {
                ClassifiedError::general(err.to_string())
                    .with_hint("Check ~/.config/gplay/config.toml and GPLAY_* environment variables")
            }
        }
        ApiError::Serialization(_) | ApiError::Render(_) => {
            ClassifiedError::general(err.to_string())
        }
    }
}

fn classify_status(status: u16, message: &str, ctx: &ClassifyContext) -> ClassifiedError {
    let classified = match status {
        401 => ClassifiedError::auth_failure(message).with_hint(TOKEN_HINT),
        403 => ClassifiedError::permission_denied(message).with_hint(
            "Check that the account behind the token has access to this app in Play Console",
        ),
        404 => {
            let not_found = ClassifiedError::not_found(message);
            if ctx.family == ServiceFamily::Reporting {
                not_found.with_hint(REPORTING_DISABLED_HINT)
            } else {
                not_found
            }
        }
        409 => ClassifiedError::conflict(message),
        429 => ClassifiedError::rate_limited(message)
            .with_hint("Quota exhausted; wait before issuing more requests"),
        500..=599 => ClassifiedError::network(message),
        _ if matches_auth_pattern(message) => {
            ClassifiedError::auth_failure(message).with_hint(TOKEN_HINT)
        }
        _ => ClassifiedError::general(message),
    };
    classified.with_http_status(status)
}

fn matches_auth_pattern(text: &str) -> bool {
    let lower = text.to_lowercase();
    AUTH_FAILURE_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}
