//! Run command action

use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::warn;

use crate::actions::{Action, ActionOutput, BoxFuture};
use crate::error::ActionError;

use super::ShellConfig;

/// Action for running whitelisted shell commands
pub struct RunCommand {
    config: ShellConfig,
    working_dir: PathBuf,
}

impl RunCommand {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            config: ShellConfig::default(),
            working_dir,
        }
    }

    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.config.policy.is_allowed(command)
    }
}

/// Accept either `"whoami"` or `{"command": "whoami"}`.
fn command_param(params: &Value) -> Result<&str, ActionError> {
    match params {
        Value::String(command) => Ok(command),
        Value::Object(map) => map
            .get("command")
            .or_else(|| map.get("cmd"))
            .and_then(Value::as_str)
            .ok_or_else(|| ActionError::InvalidParameters("command is required".into())),
        _ => Err(ActionError::InvalidParameters(
            "expected a command string".into(),
        )),
    }
}

impl Action for RunCommand {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Runs a system command and returns the output"
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<ActionOutput, ActionError>> {
        Box::pin(async move {
            let command = command_param(&params)?;

            if !self.is_allowed(command) {
                warn!(command, "refused command outside the whitelist");
                return Err(ActionError::CommandNotAllowed(command.to_string()));
            }

            let result =
                deskhand_sandbox::run_with_timeout(command, &self.working_dir, self.config.timeout)
                    .await?;

            Ok(ActionOutput::success(json!({
                "exit_code": result.exit_code,
                "stdout": result.stdout,
                "stderr": result.stderr
            })))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_param_shapes() {
        assert_eq!(command_param(&json!("whoami")).unwrap(), "whoami");
        assert_eq!(command_param(&json!({"command": "ls"})).unwrap(), "ls");
        assert!(matches!(
            command_param(&json!({"other": "ls"})),
            Err(ActionError::InvalidParameters(_))
        ));
        assert!(matches!(
            command_param(&json!(42)),
            Err(ActionError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_whitelist_check() {
        let action = RunCommand::new(std::env::temp_dir());
        assert!(action.is_allowed("echo hi"));
        assert!(action.is_allowed("ECHO test"));
        assert!(!action.is_allowed("rm -rf /"));
    }
}
