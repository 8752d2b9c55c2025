//! Deskhand Sandbox - bounded execution of whitelisted commands
//!
//! Two pieces live here:
//! - [`policy::CommandPolicy`], the allow-list every command must pass
//! - [`process::run_with_timeout`], which runs an allowed command in its own
//!   process group and tears the whole group down when the deadline passes

pub mod policy;
pub mod process;

pub use policy::{CommandPolicy, DEFAULT_ALLOWED_COMMANDS};
pub use process::{run_with_timeout, shell_command};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a command that ran to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Sandbox errors
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Failed to spawn command: {0}")]
    Spawn(String),
    #[error("Execution failed: {0}")]
    Execution(String),
    #[error("Command execution timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("Policy violation: {0}")]
    PolicyViolation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
