//! Config loading facade: one entry point for defaults, file and environment.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{env, global_file};
use super::AppConfig;
use crate::error::ApiError;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, then the explicit file (or the global file when none is
    /// given), then `GPLAY_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = match explicit {
            Some(path) => global_file::add_explicit_to_builder(builder, path)?,
            None => global_file::add_to_builder(builder)?,
        };
        let builder = env::add_to_builder(builder)?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            output = %config.output.format,
            timeout_secs = config.request.timeout_secs,
            has_token = config.auth.access_token.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
