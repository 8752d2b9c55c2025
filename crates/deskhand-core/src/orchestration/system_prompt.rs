//! System prompt management
//!
//! Builds the base assistant prompt and the capability prompt that tells
//! the model which actions exist and how to request them.

use crate::actions::ActionRegistry;

/// Default base prompt for the assistant
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Answer questions concisely and accurately. \
If you don't know something, say so rather than making up information.";

const ACTIONS_PREAMBLE: &str = "You are a helpful assistant with the ability to perform actions. \
When appropriate, you can perform an action by replying with a JSON object that names it \
in an \"action_type\" field, with its parameters alongside.";

const ACTIONS_FORMAT: &str = r#"Always format action calls in triple backtick code blocks with json format, for example:
```json
{"action_type": "system_info"}
```
```json
{"action_type": "run_command", "command": "whoami"}
```
```json
{"action_type": "file_operation", "operation": "read", "file_path": "notes.txt"}
```"#;

/// System prompt configuration and generation
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    /// Base system prompt
    base: String,
    /// Additional context
    context: Option<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPrompt {
    /// Create a new system prompt with the default content
    pub fn new() -> Self {
        Self::with_base(DEFAULT_SYSTEM_PROMPT)
    }

    /// Create with custom base prompt
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            context: None,
        }
    }

    /// Add custom context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build the final system prompt
    pub fn build(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{}\n\n{}", self.base, ctx),
            None => self.base.clone(),
        }
    }

    /// Get the base prompt without context
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Prompt advertising every registered action
    pub fn actions(registry: &ActionRegistry) -> String {
        let listing: String = registry
            .list()
            .iter()
            .map(|(name, description)| format!("- {}: {}\n", name, description))
            .collect();

        format!(
            "{}\nYou can use the following actions:\n{}\n{}",
            ACTIONS_PREAMBLE, listing, ACTIONS_FORMAT
        )
    }
}
