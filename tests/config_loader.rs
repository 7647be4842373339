mod common;

use common::temp_config_file;
use cortina_medals::api::Locale;
use cortina_medals::config::{ApiConfig, Config, ConfigError, Defaults};
use std::time::Duration;

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.defaults.locale, Locale::English);
    assert_eq!(config.defaults.update_interval_seconds, 300);
    assert_eq!(config.defaults.timeout_seconds, 30);
    assert_eq!(config.defaults.connect_timeout_seconds, 10);
    assert_eq!(config.defaults.probe_timeout_seconds, 10);
    assert_eq!(config.update_interval(), Duration::from_secs(300));

    assert_eq!(
        config.api.base_url,
        "https://www.olympics.com/wmr-owg2026/competition/api"
    );
    assert_eq!(config.api.endpoint, "medals");
    assert!(config.api.user_agent.starts_with("cortina-medals/"));
    assert_eq!(config.api.accept_language, "en-US,en;q=0.9");
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("cortina-medals/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validation_rejects_non_http_base_url() {
    let config = Config {
        defaults: Defaults::default(),
        api: ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..ApiConfig::default()
        },
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("must start with http:// or https://"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_rejects_empty_endpoint() {
    let mut config = Config::default();
    config.api.endpoint = " / ".to_string();

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("endpoint must not be empty"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_rejects_zero_interval() {
    let mut config = Config::default();
    config.defaults.update_interval_seconds = 0;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("update_interval_seconds must be greater than zero"));
}

#[test]
fn test_validation_bounds_interval_at_one_day() {
    let mut config = Config::default();
    config.defaults.update_interval_seconds = 86_400;
    assert!(config.validate().is_ok());

    for interval in [86_401, u64::MAX] {
        config.defaults.update_interval_seconds = interval;
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains("update_interval_seconds must be at most 86400"),
            "unexpected error for {}: {}",
            interval,
            err
        );
    }
}

#[test]
fn test_oversized_interval_in_file_is_rejected() {
    let (_dir, path) = temp_config_file("[defaults]\nupdate_interval_seconds = 86401\n");
    assert!(matches!(
        Config::load_from(&path).unwrap_err(),
        ConfigError::ValidationError { .. }
    ));
}

#[test]
fn test_validation_rejects_zero_timeouts() {
    for field in ["timeout_seconds", "connect_timeout_seconds", "probe_timeout_seconds"] {
        let mut config = Config::default();
        match field {
            "timeout_seconds" => config.defaults.timeout_seconds = 0,
            "connect_timeout_seconds" => config.defaults.connect_timeout_seconds = 0,
            _ => config.defaults.probe_timeout_seconds = 0,
        }

        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains(&format!("{} must be greater than zero", field)),
            "unexpected error for {}: {}",
            field,
            err
        );
    }
}

#[test]
fn test_load_full_toml() {
    let (_dir, path) = temp_config_file(
        r#"
[defaults]
locale = "FRA"
update_interval_seconds = 120
timeout_seconds = 20
connect_timeout_seconds = 5
probe_timeout_seconds = 8

[api]
base_url = "http://localhost:8080/api"
endpoint = "standings"
user_agent = "test-agent"
accept_language = "fr-FR"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.defaults.locale, Locale::French);
    assert_eq!(config.defaults.update_interval_seconds, 120);
    assert_eq!(config.defaults.timeout_seconds, 20);
    assert_eq!(config.defaults.connect_timeout_seconds, 5);
    assert_eq!(config.defaults.probe_timeout_seconds, 8);
    assert_eq!(config.api.base_url, "http://localhost:8080/api");
    assert_eq!(config.api.endpoint, "standings");
    assert_eq!(config.api.user_agent, "test-agent");
    assert_eq!(config.api.accept_language, "fr-FR");
}

#[test]
fn test_partial_toml_uses_defaults() {
    let (_dir, path) = temp_config_file(
        r#"
[defaults]
update_interval_seconds = 60
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.defaults.update_interval_seconds, 60);
    assert_eq!(config.defaults.locale, Locale::English);
    assert_eq!(config.defaults.timeout_seconds, 30);
    assert_eq!(config.api.endpoint, "medals");
}

#[test]
fn test_missing_file_returns_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.defaults.update_interval_seconds, 300);
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = temp_config_file("[defaults\nlocale = ");

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: err_path, .. } => assert_eq!(err_path, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_unknown_locale_is_parse_error() {
    let (_dir, path) = temp_config_file("[defaults]\nlocale = \"DEU\"\n");
    assert!(matches!(
        Config::load_from(&path).unwrap_err(),
        ConfigError::ParseError { .. }
    ));
}

#[test]
fn test_loaded_config_is_validated() {
    let (_dir, path) = temp_config_file("[defaults]\ntimeout_seconds = 0\n");
    assert!(matches!(
        Config::load_from(&path).unwrap_err(),
        ConfigError::ValidationError { .. }
    ));
}
