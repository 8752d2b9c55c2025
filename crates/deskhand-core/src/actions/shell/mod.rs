//! Shell actions for command execution

mod run_command;

pub use run_command::RunCommand;

use deskhand_sandbox::CommandPolicy;
use std::time::Duration;

/// Default hard limit for a single command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for shell execution security
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Commands that may run, matched on their leading token
    pub policy: CommandPolicy,
    /// Wall-clock limit for each command
    pub timeout: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            policy: CommandPolicy::default(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl ShellConfig {
    pub fn with_allowed_commands(mut self, allowed: impl IntoIterator<Item = String>) -> Self {
        self.policy = CommandPolicy::new(allowed);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
