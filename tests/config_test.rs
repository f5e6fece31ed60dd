//! Tests for config loading from the environment and TOML files

use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use brickdoc::config::Config;

const ENV_KEYS: &[&str] = &[
    "BRICKDOC_BASE_URL",
    "BRICKDOC_LOCALE",
    "BRICKDOC_RATE_LIMIT",
    "BRICKDOC_REQUEST_TIMEOUT",
    "BRICKDOC_USER_AGENT",
    "BRICKDOC_MAX_REDIRECTS",
    "BRICKDOC_OUTPUT_DIR",
    "BRICKDOC_REPORT_PATH",
    "BRICKDOC_EXCLUDED_THEMES",
    "BRICKDOC_STOP_ON_PURIFICATION_ERROR",
    "BRICKDOC_LOG_LEVEL",
    "BRICKDOC_LOG_FORMAT",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.crawler.base_url, "https://www.lego.com");
    assert_eq!(config.crawler.locale, "en-us");
    assert_eq!(config.crawler.user_agent, None);
    assert_eq!(config.matcher.excluded_themes, vec!["Duplo".to_string()]);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("BRICKDOC_BASE_URL", "http://localhost:8080/");
    std::env::set_var("BRICKDOC_RATE_LIMIT", "0.5");
    std::env::set_var("BRICKDOC_OUTPUT_DIR", "/srv/instructions");
    std::env::set_var("BRICKDOC_EXCLUDED_THEMES", "Duplo, Technic ,");
    std::env::set_var("BRICKDOC_STOP_ON_PURIFICATION_ERROR", "true");
    std::env::set_var("BRICKDOC_USER_AGENT", "brickdoc-test/1.0");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.crawler.base_url, "http://localhost:8080");
    assert_eq!(config.crawler.rate_limit, 0.5);
    assert_eq!(config.storage.output_dir, PathBuf::from("/srv/instructions"));
    assert_eq!(
        config.report_path(),
        PathBuf::from("/srv/instructions/brickdoc-report.json")
    );
    assert_eq!(
        config.matcher.excluded_themes,
        vec!["Duplo".to_string(), "Technic".to_string()]
    );
    assert!(config.matcher.stop_on_purification_error);
    assert_eq!(config.crawler.user_agent.as_deref(), Some("brickdoc-test/1.0"));
}

#[test]
#[serial]
fn test_from_env_ignores_unparsable_numbers() {
    clear_env();
    std::env::set_var("BRICKDOC_RATE_LIMIT", "fast");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.crawler.rate_limit, 2.0);
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[crawler]
base_url = "https://catalog.example.com"
locale = "de-de"
rate_limit = 1.5
max_redirects = 3

[storage]
output_dir = "/data/bi"
report_path = "/data/reports/run.json"

[matcher]
excluded_themes = []
stop_on_purification_error = true

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.crawler.locale, "de-de");
    assert_eq!(config.crawler.max_redirects, 3);
    assert_eq!(config.crawler.request_timeout_secs, 30);
    assert!(config.matcher.excluded_themes.is_empty());
    assert_eq!(config.report_path(), PathBuf::from("/data/reports/run.json"));
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_from_file_invalid_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[crawler\nrate_limit = ").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML config file"));
}

#[test]
fn test_from_file_missing() {
    let err = Config::from_file(std::path::Path::new("/nonexistent/brickdoc.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
