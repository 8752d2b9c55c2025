//! Run command action tests
//!
//! Whitelist enforcement, output capture and the hard timeout.

#![cfg(unix)]

use deskhand_core::actions::{Action, RunCommand, ShellConfig};
use deskhand_core::ActionError;
use serde_json::json;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn setup_workspace() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

mod whitelist_tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_captures_stdout() {
        let dir = setup_workspace();
        let action = RunCommand::new(dir.path().to_path_buf());

        let output = action.execute(json!({"command": "echo hello"})).await.unwrap();
        assert!(output.success);
        assert_eq!(output.get("stdout"), Some(&json!("hello\n")));
        assert_eq!(output.get("exit_code"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_whoami_bare_string_param() {
        let dir = setup_workspace();
        let action = RunCommand::new(dir.path().to_path_buf());

        let output = action.execute(json!("whoami")).await.unwrap();
        assert!(output.success);
        assert!(output.get("stdout").is_some());
        assert!(output.get("stderr").is_some());
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = setup_workspace();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let action = RunCommand::new(dir.path().to_path_buf());

        let output = action.execute(json!("ls")).await.unwrap();
        let stdout = output.get("stdout").and_then(|v| v.as_str()).unwrap();
        assert!(stdout.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_refused_command_is_not_run() {
        let dir = setup_workspace();
        let action = RunCommand::new(dir.path().to_path_buf());

        let err = action.execute(json!("rm -rf /")).await.unwrap_err();
        assert!(matches!(err, ActionError::CommandNotAllowed(ref c) if c == "rm -rf /"));
        assert_eq!(
            err.to_string(),
            "Command 'rm -rf /' is not allowed for security reasons."
        );
    }

    #[tokio::test]
    async fn test_chained_command_is_refused() {
        let dir = setup_workspace();
        let action = RunCommand::new(dir.path().to_path_buf());

        let err = action
            .execute(json!("echo hi; touch pwned"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::CommandNotAllowed(_)));
        assert!(!dir.path().join("pwned").exists());
    }

    #[tokio::test]
    async fn test_leading_token_is_case_insensitive() {
        let dir = setup_workspace();
        let action = RunCommand::new(dir.path().to_path_buf());
        assert!(action.is_allowed("ECHO test"));
    }
}

mod timeout_tests {
    use super::*;

    #[tokio::test]
    async fn test_long_command_times_out_on_schedule() {
        let dir = setup_workspace();
        let config = ShellConfig::default()
            .with_allowed_commands(vec!["sleep".to_string()])
            .with_timeout(Duration::from_secs(1));
        let action = RunCommand::new(dir.path().to_path_buf()).with_config(config);

        let started = Instant::now();
        let err = action.execute(json!("sleep 5")).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, ActionError::Timeout(_)));
        assert!(err.to_string().contains("timed out"));
        assert!(elapsed >= Duration::from_secs(1), "returned early: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(3), "returned late: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_timeout_surfaces_through_registry() {
        let dir = setup_workspace();
        let config = ShellConfig::default()
            .with_allowed_commands(vec!["sleep".to_string()])
            .with_timeout(Duration::from_millis(300));
        let registry = deskhand_core::standard_registry(dir.path().to_path_buf(), config);

        let output = registry.execute("run_command", json!({"command": "sleep 3"})).await;
        assert!(!output.success);
        assert_eq!(output.error_kind.as_deref(), Some("Timeout"));
        assert!(output.error.unwrap().contains("timed out"));
    }
}
