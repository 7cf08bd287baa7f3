//! Merge rules: defaults, override order, conflict handling.
//!
//! Order, lowest to highest: built-in defaults, config file, `GPLAY_*`
//! environment, command-line flags (applied by the CLI layer).

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_PUBLISHER_BASE_URL: &str = "https://androidpublisher.googleapis.com";
pub const DEFAULT_REPORTING_BASE_URL: &str = "https://playdeveloperreporting.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("output.format", "json")?
        .set_default("output.pretty", false)?
        .set_default("request.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("api.publisher_base_url", DEFAULT_PUBLISHER_BASE_URL)?
        .set_default("api.reporting_base_url", DEFAULT_REPORTING_BASE_URL)
}
