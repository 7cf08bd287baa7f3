//! Layered configuration: defaults, file, then `GPLAY_*` environment.

use super::test_utils::with_env;
use gplay::config::{ConfigLoader, ACCESS_TOKEN_VAR, DEFAULT_TIMEOUT_SECS};
use std::fs;
use tempfile::TempDir;

const CONFIG_VARS: [&str; 4] = [
    "GPLAY_ACCESS_TOKEN",
    "GPLAY_REQUEST__TIMEOUT_SECS",
    "GPLAY_OUTPUT__FORMAT",
    "XDG_CONFIG_HOME",
];

fn cleared<'a>(overrides: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut vars: Vec<(&str, Option<&str>)> = CONFIG_VARS
        .iter()
        .filter(|name| !overrides.iter().any(|(key, _)| key == *name))
        .map(|name| (*name, None))
        .collect();
    vars.extend_from_slice(overrides);
    vars
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gplay.toml");
    fs::write(
        &path,
        "[request]\ntimeout_secs = 12\n\n[output]\nformat = \"markdown\"\n",
    )
    .unwrap();
    let config_home = dir.path().join("xdg");

    let config = with_env(
        &cleared(&[
            ("GPLAY_REQUEST__TIMEOUT_SECS", Some("45")),
            ("XDG_CONFIG_HOME", config_home.to_str()),
        ]),
        || ConfigLoader::load(Some(&path)),
    )
    .unwrap();

    assert_eq!(config.request.timeout_secs, 45);
    assert_eq!(config.output.format, "markdown");
}

#[test]
fn test_access_token_shorthand() {
    let dir = TempDir::new().unwrap();
    let config_home = dir.path().join("xdg");

    let config = with_env(
        &cleared(&[
            (ACCESS_TOKEN_VAR, Some("ya29.token")),
            ("XDG_CONFIG_HOME", config_home.to_str()),
        ]),
        || ConfigLoader::load(None),
    )
    .unwrap();

    assert_eq!(config.auth.access_token.as_deref(), Some("ya29.token"));
    assert_eq!(config.request.timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn test_global_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let config_home = dir.path().join("xdg");
    fs::create_dir_all(config_home.join("gplay")).unwrap();
    fs::write(
        config_home.join("gplay").join("config.toml"),
        "[auth]\naccess_token = \"from-file\"\n",
    )
    .unwrap();

    let config = with_env(
        &cleared(&[("XDG_CONFIG_HOME", config_home.to_str())]),
        || ConfigLoader::load(None),
    )
    .unwrap();

    assert_eq!(config.auth.access_token.as_deref(), Some("from-file"));
}

#[test]
fn test_invalid_environment_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_home = dir.path().join("xdg");

    let result = with_env(
        &cleared(&[
            ("GPLAY_OUTPUT__FORMAT", Some("yaml")),
            ("XDG_CONFIG_HOME", config_home.to_str()),
        ]),
        || ConfigLoader::load(None),
    );

    assert!(result.is_err());
}
