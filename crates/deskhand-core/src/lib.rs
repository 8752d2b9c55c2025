//! Deskhand Core - a local chat agent that can act on the machine it runs on
//!
//! This crate provides:
//! - Whitelisted actions (system info, shell commands, confined file access)
//! - The dispatch loop that runs action requests embedded in model replies
//! - Chat backends and the conversation session driving them
//! - Configuration

pub mod actions;
pub mod config;
pub mod error;
pub mod orchestration;
pub mod provider;
pub mod session;

pub use actions::{
    standard_registry, Action, ActionOutput, ActionRegistry, FileOperation, RunCommand,
    ShellConfig, SystemInfo,
};
pub use config::{defaults, Config, ConfigManager};
pub use error::{ActionError, Error, Result};
pub use orchestration::{ActionDispatcher, ChatMessage, Role, SystemPrompt};
pub use provider::{ChatBackend, OllamaBackend, ScriptedBackend};
pub use session::{AgentSession, SessionConfig};
