//! Configuration file discovery and environment overrides.

mod support;

use std::fs;
use std::path::PathBuf;

use cartographer::config::{AppConfig, ConfigError, CONFIG_ENV};

const ALL_VARS: [&str; 6] = [
    CONFIG_ENV,
    "HOST",
    "PORT",
    "HD_API_TOKEN",
    "SWISS_EPHEMERIS_PATH",
    "HD_DIGNITY_TABLE",
];

fn cleared<'a>() -> Vec<(&'a str, Option<&'a str>)> {
    ALL_VARS.iter().map(|k| (*k, None)).collect()
}

#[test]
fn test_config_env_points_at_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        "[server]\nport = 9001\napi_token = \"from-file\"\n\n[render]\npng_scale = 3.0\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();

    let mut env = cleared();
    env[0] = (CONFIG_ENV, Some(path_str.as_str()));
    support::with_scoped_env(&env, || {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.api_token.as_deref(), Some("from-file"));
        assert_eq!(config.render.png_scale, 3.0);
    });
}

#[test]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cartographer.toml");
    fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9001\n").unwrap();
    let path_str = path.to_string_lossy().to_string();

    support::with_scoped_env(
        &[
            (CONFIG_ENV, Some(path_str.as_str())),
            ("HOST", Some("10.0.0.5")),
            ("PORT", Some("8123")),
            ("HD_API_TOKEN", Some("s3cret")),
            ("SWISS_EPHEMERIS_PATH", Some("/opt/ephe")),
            ("HD_DIGNITY_TABLE", Some("/opt/hd/dignities.json")),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.bind_address(), "10.0.0.5:8123");
            assert_eq!(config.server.api_token.as_deref(), Some("s3cret"));
            assert_eq!(config.ephemeris.path, Some(PathBuf::from("/opt/ephe")));
            assert_eq!(
                config.dignity_table_path().unwrap(),
                std::path::Path::new("/opt/hd/dignities.json")
            );
        },
    );
}

#[test]
fn test_empty_token_disables_auth() {
    let mut config = AppConfig::default();
    config.server.api_token = Some("from-file".to_string());
    let mut env = cleared();
    env[3] = ("HD_API_TOKEN", Some(""));
    support::with_scoped_env(&env, || {
        config.apply_env().unwrap();
        assert!(config.server.api_token.is_none());
    });
}

#[test]
fn test_invalid_port_is_rejected() {
    let mut env = cleared();
    env[2] = ("PORT", Some("eighty"));
    support::with_scoped_env(&env, || {
        let mut config = AppConfig::default();
        let err = config.apply_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    });
}

#[test]
fn test_missing_config_env_file_is_an_error() {
    let mut env = cleared();
    env[0] = (CONFIG_ENV, Some("/nonexistent/cartographer.toml"));
    support::with_scoped_env(&env, || {
        assert!(matches!(
            AppConfig::from_default_location(),
            Err(ConfigError::Read { .. })
        ));
    });
}

#[test]
fn test_file_without_dignity_table_cannot_serve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cartographer.toml");
    fs::write(&path, "[server]\nport = 9001\n").unwrap();
    let path_str = path.to_string_lossy().to_string();

    let mut env = cleared();
    env[0] = (CONFIG_ENV, Some(path_str.as_str()));
    support::with_scoped_env(&env, || {
        let config = AppConfig::load().unwrap();
        assert!(matches!(
            config.dignity_table_path(),
            Err(ConfigError::Missing { .. })
        ));
    });
}
