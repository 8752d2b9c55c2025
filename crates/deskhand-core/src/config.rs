//! Configuration management for deskhand

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use deskhand_sandbox::DEFAULT_ALLOWED_COMMANDS;

use crate::actions::ShellConfig;
use crate::error::{Error, Result};

/// Default values shared by the config sections
pub mod defaults {
    pub const BASE_URL: &str = "http://localhost:11434";
    pub const MODEL: &str = "llama3";
    pub const TEMPERATURE: f32 = 0.7;
    pub const TOP_P: f32 = 0.9;
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const COMMAND_TIMEOUT_SECS: u64 = 10;
    pub const LOG_LEVEL: &str = "warn";
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Chat backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Inference server address
    pub base_url: String,
    /// Model to use
    pub model: String,
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            model: defaults::MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            top_p: defaults::TOP_P,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Action execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Whether replies are scanned for action requests
    pub enabled: bool,
    /// Whitelisted commands, matched on their leading token
    pub allowed_commands: Vec<String>,
    pub command_timeout_secs: u64,
    /// Confinement root for file operations; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_commands: DEFAULT_ALLOWED_COMMANDS.iter().map(|c| c.to_string()).collect(),
            command_timeout_secs: defaults::COMMAND_TIMEOUT_SECS,
            base_dir: None,
        }
    }
}

impl ActionsConfig {
    /// Shell settings derived from this section
    pub fn shell_config(&self) -> ShellConfig {
        ShellConfig::default()
            .with_allowed_commands(self.allowed_commands.iter().cloned())
            .with_timeout(Duration::from_secs(self.command_timeout_secs))
    }

    /// Base directory for actions, falling back to the current directory
    pub fn resolve_base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Replaces the default assistant prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path. A missing file yields
    /// the defaults.
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config_path, config })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("deskhand").join("config.toml"))
    }

    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&self.config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:11434");
        assert_eq!(config.backend.model, "llama3");
        assert!(config.actions.enabled);
        assert_eq!(config.actions.command_timeout_secs, 10);
        assert!(config.actions.allowed_commands.iter().any(|c| c == "whoami"));
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[backend]\nmodel = \"mistral\"\n").unwrap();
        assert_eq!(config.backend.model, "mistral");
        assert_eq!(config.backend.base_url, defaults::BASE_URL);
        assert_eq!(config.actions, ActionsConfig::default());
    }

    #[test]
    fn test_shell_config_from_actions() {
        let actions = ActionsConfig {
            allowed_commands: vec!["sleep".into()],
            command_timeout_secs: 2,
            ..Default::default()
        };
        let shell = actions.shell_config();
        assert_eq!(shell.timeout, Duration::from_secs(2));
        assert!(shell.policy.is_allowed("sleep 1"));
        assert!(!shell.policy.is_allowed("echo hi"));
    }
}
