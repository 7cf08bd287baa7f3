//! Shared test utilities for integration tests
//!
//! Process-wide environment variables are shared by every test in this
//! binary, so tests that touch them go through [`with_env`].

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use std::process::Output;
use std::sync::Mutex;

/// Serializes environment variable access across tests.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with `vars` set, restoring the previous values afterwards.
pub fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    result
}

/// The gplay binary with a clean environment rooted at `home`, so no user
/// config file or `GPLAY_*` variable leaks in.
pub fn gplay(home: &Path) -> Command {
    Command::from_std(gplay_process(home))
}

/// [`gplay`] as a plain process, for tests that manage the child's pipes.
pub fn gplay_process(home: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("gplay"));
    cmd.env_clear()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("GPLAY_LOG_OUTPUT", "stderr");
    cmd
}

/// Same as [`gplay`] but pointed at a mock upstream with a token set.
pub fn gplay_against(home: &Path, base_url: &str) -> Command {
    let mut cmd = gplay(home);
    cmd.env("GPLAY_ACCESS_TOKEN", "test-token")
        .env("GPLAY_API__PUBLISHER_BASE_URL", base_url)
        .env("GPLAY_API__REPORTING_BASE_URL", base_url);
    cmd
}

/// Run a prepared command off the async runtime.
pub async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

pub fn stdout_json(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(text.trim()).unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {text}"))
}
