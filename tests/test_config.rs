// Configuration tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use log::LevelFilter;
use tempfile::TempDir;

use data_integration_engine::utils::{init_logging, BackendKind, Config, EngineError};

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.store.path, "data/sample.db");
    assert!(config.store.seed);
    assert_eq!(config.files.data_dir, "data");
    assert_eq!(config.translator.backend, BackendKind::None);
    assert_eq!(config.translator.model, "llama3.2:3b");
    assert_eq!(config.translator.timeout_secs, 30);
    assert_eq!(config.log_level_filter(), LevelFilter::Info);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(
        &path,
        "translator:\n  backend: ollama\n  model: sqlcoder\nlogging:\n  level: debug\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.translator.backend, BackendKind::Ollama);
    assert_eq!(config.translator.model, "sqlcoder");
    assert_eq!(config.translator.url, "http://localhost:11434");
    assert_eq!(config.store.path, "data/sample.db");
    assert_eq!(config.log_level_filter(), LevelFilter::Debug);
}

#[test]
fn test_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, r#"{"store": {"path": "/tmp/other.db", "seed": false}}"#).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.store.path, "/tmp/other.db");
    assert!(!config.store.seed);
}

#[test]
fn test_bad_config_files() {
    let dir = TempDir::new().unwrap();

    let toml = dir.path().join("engine.toml");
    fs::write(&toml, "[store]").unwrap();
    assert!(matches!(Config::from_file(&toml), Err(EngineError::Config(_))));

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "translator: [").unwrap();
    assert!(matches!(Config::from_file(&broken), Err(EngineError::Config(_))));

    assert!(matches!(
        Config::from_file(dir.path().join("missing.yaml")),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn test_init_logging_installs_once() {
    assert!(init_logging(LevelFilter::Debug).is_ok());
    assert_eq!(log::max_level(), LevelFilter::Debug);
    log::info!("logger installed");

    // The global logger can only be set once per process
    assert!(init_logging(LevelFilter::Info).is_err());
}
