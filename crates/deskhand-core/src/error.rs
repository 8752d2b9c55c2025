//! Error types for deskhand core

use std::time::Duration;
use thiserror::Error;

/// Result type alias using the deskhand Error
pub type Result<T> = std::result::Result<T, Error>;

/// Deskhand error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("{0}")]
    Dispatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Action-specific errors.
///
/// These never escape the registry: [`crate::actions::ActionRegistry::execute`]
/// folds them into a failed [`crate::actions::ActionOutput`].
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Action '{0}' not found")]
    ActionNotFound(String),

    #[error("Command '{0}' is not allowed for security reasons.")]
    CommandNotAllowed(String),

    #[error("Command execution timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("{0}")]
    ExecutionError(String),

    #[error("Access denied: Cannot access paths outside the base directory ({0})")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0} is a directory, not a file")]
    IsADirectory(String),

    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl ActionError {
    /// Stable tag naming the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActionNotFound(_) => "ActionNotFound",
            Self::CommandNotAllowed(_) => "CommandNotAllowed",
            Self::Timeout(_) => "Timeout",
            Self::ExecutionError(_) => "ExecutionError",
            Self::AccessDenied(_) => "AccessDenied",
            Self::NotFound(_) => "NotFound",
            Self::IsADirectory(_) => "IsADirectory",
            Self::NotADirectory(_) => "NotADirectory",
            Self::UnsupportedOperation(_) => "UnsupportedOperation",
            Self::InvalidParameters(_) => "InvalidParameters",
        }
    }
}

impl From<std::io::Error> for ActionError {
    fn from(e: std::io::Error) -> Self {
        Self::ExecutionError(e.to_string())
    }
}

impl From<deskhand_sandbox::SandboxError> for ActionError {
    fn from(e: deskhand_sandbox::SandboxError) -> Self {
        use deskhand_sandbox::SandboxError;

        match e {
            SandboxError::Timeout(d) => Self::Timeout(d),
            other => Self::ExecutionError(other.to_string()),
        }
    }
}
