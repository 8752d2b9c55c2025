//! File operation action: read, write, and list under a fixed base directory

use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::actions::{Action, ActionOutput, BoxFuture};
use crate::error::ActionError;

use super::{path_to_display, resolve_within};

/// Supported file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperationKind {
    Read,
    Write,
    List,
}

impl FromStr for FileOperationKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "list" => Ok(Self::List),
            other => Err(ActionError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Action for basic file operations confined to `base_dir`
pub struct FileOperation {
    base_dir: PathBuf,
}

impl FileOperation {
    /// `base_dir` is captured once; relative bases are anchored to the
    /// current working directory.
    pub fn new(base_dir: PathBuf) -> Self {
        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&base_dir))
                .unwrap_or(base_dir)
        };
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn read(&self, target: &Path, path: &str) -> Result<ActionOutput, ActionError> {
        let metadata = match tokio::fs::metadata(target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ActionError::NotFound(format!("File not found: {}", path)));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            return Err(ActionError::IsADirectory(path.to_string()));
        }

        let content = tokio::fs::read_to_string(target).await?;
        Ok(ActionOutput::success(json!({ "content": content })))
    }

    async fn list(&self, target: &Path, path: &str) -> Result<ActionOutput, ActionError> {
        let metadata = match tokio::fs::metadata(target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ActionError::NotFound(format!("Directory not found: {}", path)));
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_dir() {
            return Err(ActionError::NotADirectory(path.to_string()));
        }

        let mut items = Vec::new();
        let mut dir = tokio::fs::read_dir(target).await?;
        while let Some(entry) = dir.next_entry().await? {
            items.push(entry.file_name().to_string_lossy().to_string());
        }
        items.sort();

        Ok(ActionOutput::success(json!({
            "items": items,
            "path": path
        })))
    }

    async fn write(
        &self,
        target: &Path,
        path: &str,
        content: &str,
    ) -> Result<ActionOutput, ActionError> {
        let parent_exists = match target.parent() {
            Some(parent) => tokio::fs::metadata(parent)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false),
            None => false,
        };

        if !parent_exists {
            let parent = Path::new(path)
                .parent()
                .map(path_to_display)
                .unwrap_or_default();
            return Err(ActionError::NotFound(format!("Directory not found: {}", parent)));
        }

        tokio::fs::write(target, content).await?;

        Ok(ActionOutput::success(json!({
            "message": format!("File written: {}", path),
            "bytes_written": content.len()
        })))
    }
}

fn string_param<'a>(params: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| params.get(*key).and_then(Value::as_str))
}

impl Action for FileOperation {
    fn name(&self) -> &str {
        "file_operation"
    }

    fn description(&self) -> &str {
        "Performs basic file operations like reading, writing, and listing directories. \
         Parameters: operation (read|write|list), file_path (relative), content (for write)"
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<ActionOutput, ActionError>> {
        Box::pin(async move {
            let Value::Object(params) = params else {
                return Err(ActionError::InvalidParameters(
                    "expected an object with operation and file_path".into(),
                ));
            };

            let operation = string_param(&params, &["operation"])
                .ok_or_else(|| ActionError::InvalidParameters("operation is required".into()))?;
            let kind = operation.parse::<FileOperationKind>()?;
            let path = string_param(&params, &["file_path", "path"]).unwrap_or("");

            // An empty path names the base directory, which only list accepts
            if path.is_empty() && kind != FileOperationKind::List {
                return Err(ActionError::InvalidParameters("file_path is required".into()));
            }

            let target = resolve_within(&self.base_dir, path).inspect_err(|_| {
                let base_dir = self.base_dir.display();
                warn!(path, %base_dir, "refused path outside base directory");
            })?;
            debug!(operation, target = %target.display(), "file operation");

            match kind {
                FileOperationKind::Read => self.read(&target, path).await,
                FileOperationKind::List => self.list(&target, path).await,
                FileOperationKind::Write => {
                    let content = string_param(&params, &["content"]).unwrap_or("");
                    self.write(&target, path, content).await
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing() {
        assert_eq!("read".parse::<FileOperationKind>().unwrap(), FileOperationKind::Read);
        assert_eq!("list".parse::<FileOperationKind>().unwrap(), FileOperationKind::List);
        assert!(matches!(
            "delete".parse::<FileOperationKind>(),
            Err(ActionError::UnsupportedOperation(op)) if op == "delete"
        ));
    }

    #[test]
    fn test_relative_base_is_anchored() {
        let action = FileOperation::new(PathBuf::from("sub"));
        assert!(action.base_dir().is_absolute());
        assert!(action.base_dir().ends_with("sub"));
    }
}
