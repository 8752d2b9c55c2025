//! Configuration management tests

use deskhand_core::config::{ActionsConfig, BackendConfig, Config, ConfigManager};
use deskhand_core::SessionConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_config_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = setup_config_dir();
    let manager = ConfigManager::with_path(dir.path().join("config.toml")).unwrap();

    assert_eq!(manager.config().backend, BackendConfig::default());
    assert_eq!(manager.config().actions, ActionsConfig::default());
}

#[test]
fn test_save_and_reload() {
    let dir = setup_config_dir();
    let path = dir.path().join("nested").join("config.toml");

    let mut manager = ConfigManager::with_path(path.clone()).unwrap();
    manager.config_mut().backend.model = "mistral".to_string();
    manager.config_mut().actions.allowed_commands = vec!["echo".into(), "date".into()];
    manager.config_mut().actions.base_dir = Some(PathBuf::from("/srv/work"));
    manager.save().unwrap();
    assert!(path.exists());

    let reloaded = ConfigManager::with_path(path).unwrap();
    assert_eq!(reloaded.config().backend.model, "mistral");
    assert_eq!(reloaded.config().actions.allowed_commands, vec!["echo", "date"]);
    assert_eq!(reloaded.config().actions.base_dir, Some(PathBuf::from("/srv/work")));
}

#[test]
fn test_load_from_toml_file() {
    let dir = setup_config_dir();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[backend]
base_url = "http://gpu-box:11434"
request_timeout_secs = 30

[actions]
enabled = false
command_timeout_secs = 5

[general]
system_prompt = "You are a pirate."
"#,
    )
    .unwrap();

    let manager = ConfigManager::with_path(path).unwrap();
    let config = manager.config();
    assert_eq!(config.backend.base_url, "http://gpu-box:11434");
    assert_eq!(config.backend.model, "llama3");
    assert_eq!(config.backend.request_timeout_secs, 30);
    assert!(!config.actions.enabled);
    assert_eq!(config.general.system_prompt.as_deref(), Some("You are a pirate."));
    assert_eq!(config.general.log_level, "warn");

    let session = SessionConfig::from_config(config);
    assert!(!session.actions_enabled);
    assert_eq!(session.system_prompt.build(), "You are a pirate.");
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let dir = setup_config_dir();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[backend\nmodel = ").unwrap();

    let err = ConfigManager::with_path(path).err().expect("parse should fail");
    assert!(err.to_string().starts_with("Configuration error: Failed to parse config"));
}

#[test]
fn test_base_dir_defaults_to_cwd() {
    let actions = ActionsConfig::default();
    assert_eq!(actions.resolve_base_dir().unwrap(), std::env::current_dir().unwrap());

    let config = Config::default();
    assert!(config.general.system_prompt.is_none());
}
