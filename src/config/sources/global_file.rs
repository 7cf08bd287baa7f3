//! Global config file source: $XDG_CONFIG_HOME/gplay/config.toml or ~/.config/gplay/config.toml,
//! or an explicit `--config` path.

use crate::error::ApiError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to global config file.
fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gplay").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ApiError> {
    match global_config_path() {
        Some(path) if path.exists() => {
            debug!(config_path = %path.display(), "Loading global configuration");
            Ok(builder.add_source(File::from(path.as_path()).required(false)))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No global configuration file");
            Ok(builder)
        }
        None => Ok(builder),
    }
}

/// Add an explicitly requested config file. The file must exist.
pub fn add_explicit_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ApiError> {
    if !path.is_file() {
        return Err(ApiError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
        });
    }
    debug!(config_path = %path.display(), "Loading explicit configuration");
    Ok(builder.add_source(File::from(path).required(true)))
}
