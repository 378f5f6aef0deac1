//! Unit tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing TOML files fall back to compiled defaults without failing
//! - Priority order: command line → AICD_CONFIG → user file → defaults
//! - Token override from AICD_CLASSIFIER_TOKEN
//! - Parse and validation failures surface as `Error::Config`
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.

use aicd_common::config::{
    load_toml_config, ConfigResolver, ConfigSource, MatchProfile, TomlConfig, CONFIG_ENV_VAR,
    DEFAULT_PORT, TOKEN_ENV_VAR,
};
use aicd_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_ENV_VAR);
    env::remove_var(TOKEN_ENV_VAR);
}

/// Resolver that never touches the real per-user config directory
fn isolated_resolver() -> ConfigResolver {
    ConfigResolver::new().with_user_config_path(None)
}

#[test]
#[serial]
fn test_no_sources_uses_compiled_defaults() {
    clear_env();

    let resolved = isolated_resolver().resolve().unwrap();

    assert_eq!(resolved.source, ConfigSource::Defaults { missing: None });
    assert_eq!(resolved.config, TomlConfig::default());
    assert_eq!(resolved.config.server.port, DEFAULT_PORT);
}

#[test]
#[serial]
fn test_cli_path_is_loaded() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aicd.toml");
    fs::write(
        &path,
        r#"
[server]
port = 6001

[logging]
level = "debug"

[classifier]
enabled = false
"#,
    )
    .unwrap();

    let resolved = isolated_resolver()
        .with_cli_path(Some(path.clone()))
        .resolve()
        .unwrap();

    assert_eq!(resolved.source, ConfigSource::CommandLine(path));
    assert_eq!(resolved.config.server.port, 6001);
    assert_eq!(resolved.config.logging.level, "debug");
    assert!(!resolved.config.classifier.enabled);
}

#[test]
#[serial]
fn test_missing_cli_path_degrades_to_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let resolved = isolated_resolver()
        .with_cli_path(Some(path.clone()))
        .resolve()
        .unwrap();

    assert_eq!(
        resolved.source,
        ConfigSource::Defaults {
            missing: Some(path)
        }
    );
    assert_eq!(resolved.config, TomlConfig::default());
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let cli_path = dir.path().join("cli.toml");
    let env_path = dir.path().join("env.toml");
    fs::write(&cli_path, "[server]\nport = 7001\n").unwrap();
    fs::write(&env_path, "[server]\nport = 7002\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let resolved = isolated_resolver()
        .with_cli_path(Some(cli_path))
        .resolve()
        .unwrap();
    assert_eq!(resolved.config.server.port, 7001);

    let resolved = isolated_resolver().resolve().unwrap();
    assert_eq!(resolved.source, ConfigSource::Environment(env_path));
    assert_eq!(resolved.config.server.port, 7002);

    clear_env();
}

#[test]
#[serial]
fn test_user_file_used_when_present() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let user_path = dir.path().join("config.toml");
    fs::write(&user_path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();

    let resolved = ConfigResolver::new()
        .with_user_config_path(Some(user_path.clone()))
        .resolve()
        .unwrap();

    assert_eq!(resolved.source, ConfigSource::UserFile(user_path));
    assert_eq!(resolved.config.server.host, "0.0.0.0");
}

#[test]
#[serial]
fn test_token_env_overrides_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aicd.toml");
    fs::write(&path, "[classifier]\napi_token = \"from-file\"\n").unwrap();
    env::set_var(TOKEN_ENV_VAR, "from-env");

    let resolved = isolated_resolver()
        .with_cli_path(Some(path))
        .resolve()
        .unwrap();
    assert_eq!(resolved.config.classifier.api_token.as_deref(), Some("from-env"));

    clear_env();
}

#[test]
#[serial]
fn test_blank_token_env_is_ignored() {
    clear_env();
    env::set_var(TOKEN_ENV_VAR, "   ");

    let resolved = isolated_resolver().resolve().unwrap();
    assert!(resolved.config.classifier.api_token.is_none());

    clear_env();
}

#[test]
fn test_custom_endpoints_replace_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aicd.toml");
    fs::write(
        &path,
        r#"
[[classifier.endpoints]]
name = "local"
url = "http://127.0.0.1:9000/classify"
profile = "secondary"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.classifier.endpoints.len(), 1);
    assert_eq!(config.classifier.endpoints[0].name, "local");
    assert_eq!(config.classifier.endpoints[0].profile, MatchProfile::Secondary);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_zero_port_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[server]\nport = 0\n").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_empty_endpoint_url_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty-url.toml");
    fs::write(
        &path,
        "[[classifier.endpoints]]\nname = \"blank\"\nurl = \"  \"\n",
    )
    .unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}
