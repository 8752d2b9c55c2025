//! Session types

use std::path::Path;

use crate::config::Config;
use crate::orchestration::{SystemPrompt, DEFAULT_SYSTEM_PROMPT};

/// Unique identifier for a session
pub type SessionId = String;

/// Configuration for an agent session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base assistant prompt
    pub system_prompt: SystemPrompt,
    /// Whether assistant replies are scanned for action requests
    pub actions_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: SystemPrompt::new(),
            actions_enabled: true,
        }
    }
}

impl SessionConfig {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = SystemPrompt::with_base(prompt);
        self
    }

    pub fn with_actions_enabled(mut self, enabled: bool) -> Self {
        self.actions_enabled = enabled;
        self
    }

    /// Tell the model where relative file paths and commands are anchored.
    /// Only added when actions are enabled.
    pub fn with_base_dir(mut self, base_dir: &Path) -> Self {
        if self.actions_enabled {
            self.system_prompt = self.system_prompt.with_context(format!(
                "File paths are relative to {} and commands run there.",
                base_dir.display()
            ));
        }
        self
    }

    /// Session settings from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let prompt = config
            .general
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        Self::default()
            .with_system_prompt(prompt)
            .with_actions_enabled(config.actions.enabled)
    }
}
