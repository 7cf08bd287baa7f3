//! Configuration System
//!
//! Layered configuration for output defaults, request limits, upstream
//! endpoints, credentials and logging. Loaded through [`ConfigLoader`]; the
//! CLI layer applies flag overrides on top.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::render::OutputFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::{
    DEFAULT_PUBLISHER_BASE_URL, DEFAULT_REPORTING_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
pub use sources::env::ACCESS_TOKEN_VAR;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default rendering choices when no flag is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// json, table, markdown, csv
    #[serde(default = "default_output_format")]
    pub format: String,

    #[serde(default)]
    pub pretty: bool,
}

fn default_output_format() -> String {
    "json".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Whole-command deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub page_size: Option<u32>,

    /// Cap on pages fetched with `--all`
    #[serde(default)]
    pub max_pages: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            page_size: None,
            max_pages: None,
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Upstream endpoints. Overridable for proxies and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_publisher_base_url")]
    pub publisher_base_url: String,

    #[serde(default = "default_reporting_base_url")]
    pub reporting_base_url: String,
}

fn default_publisher_base_url() -> String {
    DEFAULT_PUBLISHER_BASE_URL.to_string()
}

fn default_reporting_base_url() -> String {
    DEFAULT_REPORTING_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            publisher_base_url: default_publisher_base_url(),
            reporting_base_url: default_reporting_base_url(),
        }
    }
}

/// Credentials. Token acquisition happens outside this tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        OutputFormat::parse(&self.output.format).map_err(|_| {
            ApiError::ConfigError(format!(
                "output.format '{}' must be one of: {}",
                self.output.format,
                OutputFormat::NAMES.join(", ")
            ))
        })?;
        if self.request.timeout_secs == 0 {
            return Err(ApiError::ConfigError(
                "request.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.request.page_size == Some(0) {
            return Err(ApiError::ConfigError(
                "request.page_size must be greater than zero".to_string(),
            ));
        }
        if self.api.publisher_base_url.trim().is_empty()
            || self.api.reporting_base_url.trim().is_empty()
        {
            return Err(ApiError::ConfigError(
                "api base URLs cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
