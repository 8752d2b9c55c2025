//! Command allow-list policy

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SandboxError;

/// Harmless introspection commands allowed when nothing else is configured
pub const DEFAULT_ALLOWED_COMMANDS: &[&str] = &[
    "echo",
    "dir",
    "ls",
    "whoami",
    "pwd",
    "hostname",
    "python --version",
];

/// Shell control sequences that would let a second command ride along
/// behind an allowed leading token.
const SHELL_CONTROL: &[&str] = &[";", "&", "|", "`", "$(", ">", "<", "\n", "\r"];

/// Ordered allow-list of commands.
///
/// A command is allowed when it matches an entry exactly, or when its
/// leading token (lower-cased) equals the leading token of some entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPolicy {
    allowed: Vec<String>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_COMMANDS.iter().map(|c| c.to_string()))
    }
}

impl CommandPolicy {
    pub fn new(allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// The configured entries, in order
    pub fn allowed_commands(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        let Some(base) = leading_token(command) else {
            return false;
        };

        if SHELL_CONTROL.iter().any(|op| command.contains(op)) {
            debug!(command, "refusing command with shell control operator");
            return false;
        }

        if self.allowed.iter().any(|entry| entry == command) {
            return true;
        }

        self.allowed
            .iter()
            .filter_map(|entry| leading_token(entry))
            .any(|entry_base| entry_base == base)
    }

    /// Same check as [`is_allowed`](Self::is_allowed), as a `Result`
    pub fn check(&self, command: &str) -> Result<(), SandboxError> {
        if self.is_allowed(command) {
            Ok(())
        } else {
            Err(SandboxError::PolicyViolation(format!(
                "Command '{}' is not allowed for security reasons.",
                command
            )))
        }
    }
}

fn leading_token(command: &str) -> Option<String> {
    command.split_whitespace().next().map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_allows_introspection() {
        let policy = CommandPolicy::default();
        assert!(policy.is_allowed("echo hi"));
        assert!(policy.is_allowed("whoami"));
        assert!(policy.is_allowed("ls -la"));
        assert!(policy.is_allowed("python --version"));
    }

    #[test]
    fn test_leading_token_is_case_insensitive() {
        let policy = CommandPolicy::default();
        assert!(policy.is_allowed("ECHO test"));
        assert!(policy.is_allowed("  Pwd"));
    }

    #[test]
    fn test_unlisted_commands_refused() {
        let policy = CommandPolicy::default();
        assert!(!policy.is_allowed("rm -rf /"));
        assert!(!policy.is_allowed("curl http://example.com"));
        assert!(!policy.is_allowed(""));
        assert!(!policy.is_allowed("   "));
    }

    #[test]
    fn test_multi_word_entry_matches_on_leading_token() {
        let policy = CommandPolicy::default();
        // "python --version" whitelists the python token
        assert!(policy.is_allowed("python -c 'print(1)'"));
    }

    #[test]
    fn test_chained_commands_refused() {
        let policy = CommandPolicy::default();
        assert!(!policy.is_allowed("echo hi; rm -rf /"));
        assert!(!policy.is_allowed("echo hi && whoami"));
        assert!(!policy.is_allowed("ls | sh"));
        assert!(!policy.is_allowed("echo $(id)"));
        assert!(!policy.is_allowed("echo pwned > file"));
        assert!(!policy.is_allowed("echo a\nrm -rf /"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = CommandPolicy::new(vec!["sleep".to_string()]);
        assert!(policy.is_allowed("sleep 1"));
        assert!(!policy.is_allowed("echo hi"));
        assert!(policy.check("echo hi").is_err());
        assert!(policy.check("sleep 2").is_ok());
    }
}
