//! Action system for deskhand agents
//!
//! Actions are the whitelisted operations a model may request from inside
//! its reply. Each action has:
//! - A unique name and a description advertised to the model
//! - An execute method taking free-form JSON parameters

pub mod filesystem;
pub mod process_utils;
pub mod shell;
pub mod system_info;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ActionError;

pub use filesystem::FileOperation;
pub use shell::{RunCommand, ShellConfig};
pub use system_info::SystemInfo;

/// Boxed future type for object-safe async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of an action invocation.
///
/// Serializes flat: `success`, then the payload fields, then `error` and
/// `error_kind` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutput {
    /// Whether the action succeeded
    pub success: bool,
    /// Operation-specific payload
    #[serde(flatten)]
    pub data: Map<String, Value>,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure class tag, e.g. `AccessDenied`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ActionOutput {
    /// Successful output. Object payloads are spread into the top level;
    /// anything else lands under `result`.
    pub fn success(data: impl Into<Value>) -> Self {
        let data = match data.into() {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };

        Self {
            success: true,
            data,
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(error: &ActionError) -> Self {
        Self {
            success: false,
            data: Map::new(),
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
        }
    }

    /// Look up a payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl From<ActionError> for ActionOutput {
    fn from(error: ActionError) -> Self {
        Self::failure(&error)
    }
}

/// Core trait for all actions
pub trait Action: Send + Sync {
    /// Action name (used by the model to invoke it)
    fn name(&self) -> &str;

    /// Description of what the action does
    fn description(&self) -> &str;

    /// Execute the action with the given parameters.
    ///
    /// `params` is whatever the model supplied: usually an object, but a bare
    /// string or number is passed through as-is.
    fn execute(&self, params: Value) -> BoxFuture<'_, Result<ActionOutput, ActionError>>;
}

/// Registry of available actions, keyed by name
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. A later registration under the same name wins.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        let name = action.name().to_string();
        if self.actions.insert(name.clone(), action).is_some() {
            debug!(action = %name, "replaced existing action registration");
        }
    }

    /// Get an action by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Names and descriptions of every registered action, sorted by name
    pub fn list(&self) -> BTreeMap<String, String> {
        self.actions
            .iter()
            .map(|(name, action)| (name.clone(), action.description().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Execute an action by name.
    ///
    /// Always resolves to an output: unknown names and action failures come
    /// back as `success: false` with an `error_kind` tag.
    pub async fn execute(&self, name: &str, params: Value) -> ActionOutput {
        let Some(action) = self.get(name) else {
            info!(action = name, "requested action is not registered");
            return ActionError::ActionNotFound(name.to_string()).into();
        };

        debug!(action = name, %params, "executing action");
        match action.execute(params).await {
            Ok(output) => output,
            Err(e) => {
                info!(action = name, kind = e.kind(), "action failed: {}", e);
                e.into()
            }
        }
    }
}

/// Registry holding the three built-in actions.
///
/// `base_dir` confines file operations and is the working directory for
/// commands.
pub fn standard_registry(base_dir: std::path::PathBuf, shell: ShellConfig) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(Arc::new(SystemInfo::new()));
    registry.register(Arc::new(RunCommand::new(base_dir.clone()).with_config(shell)));
    registry.register(Arc::new(FileOperation::new(base_dir)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_output_flattens_payload() {
        let output = ActionOutput::success(json!({"stdout": "hi\n", "exit_code": 0}));
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value, json!({"success": true, "stdout": "hi\n", "exit_code": 0}));
    }

    #[test]
    fn test_scalar_payload_lands_under_result() {
        let output = ActionOutput::success("done");
        assert_eq!(output.get("result"), Some(&json!("done")));
    }

    #[test]
    fn test_failure_output_carries_kind() {
        let output = ActionOutput::failure(&ActionError::NotFound("notes.txt".into()));
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error_kind"], json!("NotFound"));
        assert!(value["error"].as_str().unwrap().contains("notes.txt"));
    }

    #[test]
    fn test_output_deserializes_back() {
        let raw = json!({"success": false, "error": "nope", "error_kind": "Timeout"});
        let output: ActionOutput = serde_json::from_value(raw).unwrap();
        assert!(!output.success);
        assert_eq!(output.error_kind.as_deref(), Some("Timeout"));
        assert!(output.data.is_empty());
    }
}
