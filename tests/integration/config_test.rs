//! Integration tests for configuration loading.

use std::io::Write;

use docflow_core::config::AppConfig;

#[test]
fn test_load_overrides_from_toml_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "[consistency]\nmax_retries = 12\n\n[logging]\nformat = \"json\""
    )
    .expect("write config");

    let path = file.path().to_str().expect("utf-8 path");
    let config = AppConfig::load(path).expect("load config");

    assert_eq!(config.consistency.max_retries, 12);
    assert_eq!(config.logging.format, "json");
    // Untouched sections keep their defaults.
    assert_eq!(config.extraction.max_content_bytes, 16 * 1024 * 1024);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "[consistency]\nmax_retries = \"many\"").expect("write config");

    let path = file.path().to_str().expect("utf-8 path");
    let err = AppConfig::load(path).unwrap_err();
    assert_eq!(err.kind, docflow_core::error::ErrorKind::Configuration);
}

#[test]
fn test_bundled_default_config_loads() {
    let config = AppConfig::load("config/default.toml").expect("load config");
    assert_eq!(config.consistency.max_retries, 5);
    assert_eq!(config.consistency.retry_backoff_ms, 10);
}
