//! Action dispatch over assistant replies
//!
//! A reply may embed action requests as fenced JSON blocks:
//!
//! ````text
//! ```json
//! {"action_type": "run_command", "command": "whoami"}
//! ```
//! ````
//!
//! Each block is handled on its own. Blocks that are not JSON, or that do not
//! name a registered action, pass through byte-for-byte. Resolved blocks are
//! executed and the result is spliced in right after the request. A fault
//! while resolving leaves the block in place followed by a short error note.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::actions::{ActionOutput, ActionRegistry};
use crate::error::{Error, Result};

/// Fenced blocks, optionally tagged `json`. Non-greedy so that adjacent
/// blocks stay separate.
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]+?)```").expect("code block pattern is valid")
});

/// Key carrying the explicit action name
pub const ACTION_TYPE_KEY: &str = "action_type";

/// A resolved action request
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub name: String,
    pub params: Value,
    /// Resolved by scanning keys rather than through `action_type`
    pub guessed: bool,
}

/// Work out which action a parsed block asks for.
///
/// `Ok(None)` means the block is ordinary content.
pub fn resolve_request(registry: &ActionRegistry, value: &Value) -> Result<Option<ActionRequest>> {
    let Value::Object(map) = value else {
        return Ok(None);
    };

    if let Some(tag) = map.get(ACTION_TYPE_KEY) {
        let name = tag.as_str().ok_or_else(|| {
            Error::Dispatch(format!("{} must be a string, got {}", ACTION_TYPE_KEY, tag))
        })?;

        if registry.contains(name) {
            return Ok(Some(ActionRequest {
                name: name.to_string(),
                params: explicit_params(map, name),
                guessed: false,
            }));
        }
        warn!(action_type = name, "action_type names an unregistered action");
    }

    let candidates: Vec<&String> = map
        .keys()
        .filter(|key| key.as_str() != ACTION_TYPE_KEY && registry.contains(key))
        .collect();

    let Some(&name) = candidates.first() else {
        return Ok(None);
    };

    if candidates.len() > 1 {
        warn!(?candidates, chosen = %name, "several keys name registered actions, using the first");
    }
    warn!(
        action = %name,
        "action resolved from an object key; {} should be used instead",
        ACTION_TYPE_KEY
    );

    Ok(Some(ActionRequest {
        name: name.clone(),
        params: map.get(name).cloned().unwrap_or(Value::Null),
        guessed: true,
    }))
}

/// Parameters for an explicitly named action: the value under the action's
/// own name, `params`, or `parameters`, else the rest of the object.
fn explicit_params(map: &Map<String, Value>, name: &str) -> Value {
    if let Some(value) = [name, "params", "parameters"]
        .into_iter()
        .find_map(|key| map.get(key))
    {
        return value.clone();
    }

    Value::Object(
        map.iter()
            .filter(|(key, _)| key.as_str() != ACTION_TYPE_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

/// Render a block followed by its result
pub fn format_action_result(request_body: &str, output: &ActionOutput) -> Result<String> {
    let result = serde_json::to_string_pretty(output)?;
    Ok(format!(
        "```json\n{}\n```\n\nAction result:\n```json\n{}\n```",
        request_body, result
    ))
}

/// Finds, runs, and splices action requests inside assistant replies
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Rewrite `message`, replacing every fenced block according to its outcome.
    pub async fn process(&self, message: &str) -> String {
        let mut rewritten = String::with_capacity(message.len());
        let mut last = 0;

        for captures in CODE_BLOCK.captures_iter(message) {
            let Some(block) = captures.get(0) else {
                continue;
            };
            let body = captures.get(1).map_or("", |m| m.as_str()).trim();

            rewritten.push_str(&message[last..block.start()]);
            rewritten.push_str(&self.process_block(block.as_str(), body).await);
            last = block.end();
        }

        rewritten.push_str(&message[last..]);
        rewritten
    }

    async fn process_block(&self, original: &str, body: &str) -> String {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            debug!("code block is not JSON, leaving it untouched");
            return original.to_string();
        };

        match self.run_block(&value, body).await {
            Ok(Some(rendered)) => rendered,
            Ok(None) => original.to_string(),
            Err(e) => format!("{}\n\nError executing action: {}", original, e),
        }
    }

    async fn run_block(&self, value: &Value, body: &str) -> Result<Option<String>> {
        let Some(request) = resolve_request(&self.registry, value)? else {
            debug!("JSON block does not name a registered action");
            return Ok(None);
        };

        let output = self.registry.execute(&request.name, request.params).await;
        debug!(action = %request.name, success = output.success, "action finished");

        format_action_result(body, &output).map(Some)
    }
}
