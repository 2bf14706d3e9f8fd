//! # 配置文件集成测试

use arcane_host::{AppConfig, ConfigError, ElementConfig};

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arcane.json");

    let mut config = AppConfig::default();
    config.fps = 30;
    config.scene = vec![ElementConfig::new("solo", 0.0, 0.0, 64.0, 64.0).with_class("effect-card")];
    config.save(&path).unwrap();

    let loaded = AppConfig::try_load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(AppConfig::load(&path), config);
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load(dir.path().join("missing.json"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arcane.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(AppConfig::try_load(&path), Err(ConfigError::Parse(_))));
    assert_eq!(AppConfig::load(&path), AppConfig::default());
}

#[test]
fn test_partial_file_uses_field_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arcane.json");
    std::fs::write(&path, r#"{ "fps": 120 }"#).unwrap();

    let config = AppConfig::try_load(&path).unwrap();
    assert_eq!(config.fps, 120);
    assert_eq!(config.viewport.width, 1920);
    assert_eq!(config.scene.len(), 17);
    assert!(config.validate().is_ok());
}
