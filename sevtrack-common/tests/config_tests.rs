//! Tests for TOML config loading and resolution priority

use sevtrack_common::config::{
    load_config_layer, load_toml_config, ConfigOverrides, ServiceConfig, TomlConfig,
};
use sevtrack_common::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_toml() {
    let file = write_config(
        r#"
        port = 7000
        host = "127.0.0.1"
        database_url = "sqlite:///var/lib/sevtrack/bugs.db"
        log_level = "debug"

        [classifier]
        interpreter = "/usr/bin/python3.11"
        single_script = "/opt/models/single.py"
        batch_script = "/opt/models/batch.py"
        timeout_secs = 30
        "#,
    );

    let toml = load_toml_config(file.path()).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml);

    assert_eq!(config.port, 7000);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.database_url, "sqlite:///var/lib/sevtrack/bugs.db");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.classifier.interpreter, "/usr/bin/python3.11");
    assert_eq!(config.classifier.single_script, PathBuf::from("/opt/models/single.py"));
    assert_eq!(config.classifier.batch_script, PathBuf::from("/opt/models/batch.py"));
    assert_eq!(config.classifier.timeout, Some(Duration::from_secs(30)));
}

#[test]
fn test_partial_toml_falls_back_to_defaults() {
    let file = write_config("port = 6000\n");

    let toml = load_toml_config(file.path()).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml);

    assert_eq!(config.port, 6000);
    assert_eq!(config.classifier.interpreter, "python3");
}

#[test]
fn test_overrides_take_priority_over_toml() {
    let file = write_config(
        r#"
        database_url = "sqlite://from-file.db"
        [classifier]
        interpreter = "python3.9"
        "#,
    );
    let toml = load_toml_config(file.path()).unwrap();
    let overrides = ConfigOverrides {
        database_url: Some("sqlite://from-env.db".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, toml);

    assert_eq!(config.database_url, "sqlite://from-env.db");
    assert_eq!(config.classifier.interpreter, "python3.9");
}

#[test]
fn test_malformed_toml_is_error() {
    let file = write_config("port = \"not a number\"\n");

    let result = load_toml_config(file.path());
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_unknown_key_is_error() {
    let file = write_config("prot = 5000\n");

    assert!(load_toml_config(file.path()).is_err());
}

#[test]
fn test_explicit_missing_file_is_error() {
    let result = load_config_layer(Some(Path::new("/nonexistent/sevtrack/config.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_empty_file_is_default() {
    let file = write_config("");
    assert_eq!(load_toml_config(file.path()).unwrap(), TomlConfig::default());
}
