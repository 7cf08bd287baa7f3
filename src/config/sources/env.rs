//! Environment source: `GPLAY_<SECTION>__<KEY>` plus the `GPLAY_ACCESS_TOKEN` shorthand.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

pub const ACCESS_TOKEN_VAR: &str = "GPLAY_ACCESS_TOKEN";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("GPLAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let token = std::env::var(ACCESS_TOKEN_VAR)
        .ok()
        .filter(|t| !t.trim().is_empty());
    builder.set_override_option("auth.access_token", token)
}
