//! The per-turn loop of a conversation session

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::actions::ActionRegistry;
use crate::orchestration::{ActionDispatcher, ChatMessage, SystemPrompt};
use crate::provider::ChatBackend;

use super::types::{SessionConfig, SessionId};

/// A conversation with one backend and one action registry
pub struct AgentSession {
    id: SessionId,
    backend: Box<dyn ChatBackend>,
    dispatcher: ActionDispatcher,
    actions_enabled: bool,
    /// System messages the transcript starts from, and returns to on reset
    seed: Vec<ChatMessage>,
    transcript: Vec<ChatMessage>,
}

impl AgentSession {
    /// Create a session. The transcript is seeded with the base prompt and,
    /// when actions are enabled, the prompt advertising the registry.
    pub fn new(
        backend: Box<dyn ChatBackend>,
        registry: Arc<ActionRegistry>,
        config: SessionConfig,
    ) -> Self {
        let mut seed = vec![ChatMessage::system(config.system_prompt.build())];
        if config.actions_enabled {
            seed.push(ChatMessage::system(SystemPrompt::actions(&registry)));
        }

        let id = uuid::Uuid::new_v4().to_string();
        info!(
            session = %id,
            model = backend.model(),
            actions = config.actions_enabled,
            "session started"
        );

        Self {
            id,
            backend,
            dispatcher: ActionDispatcher::new(registry),
            actions_enabled: config.actions_enabled,
            transcript: seed.clone(),
            seed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model the backend talks to
    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn registry(&self) -> &ActionRegistry {
        self.dispatcher.registry()
    }

    /// Messages so far, oldest first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn actions_enabled(&self) -> bool {
        self.actions_enabled
    }

    /// Toggle reply dispatch. The seeded prompts are left as they are.
    pub fn set_actions_enabled(&mut self, enabled: bool) {
        self.actions_enabled = enabled;
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::system(content));
    }

    /// Drop the conversation, keeping only the seeded system messages
    pub fn reset(&mut self) {
        self.transcript = self.seed.clone();
        debug!(session = %self.id, "session reset");
    }

    /// Run one turn and return the reply shown to the user.
    ///
    /// On backend failure the reply is `Error: <message>` and no assistant
    /// message is recorded.
    pub async fn process_message(&mut self, content: impl Into<String>) -> String {
        self.transcript.push(ChatMessage::user(content));

        let reply = match self.backend.chat(&self.transcript).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %self.id, "backend request failed: {}", e);
                return format!("Error: {}", e);
            }
        };

        let reply = if self.actions_enabled {
            self.dispatcher.process(&reply).await
        } else {
            reply
        };

        self.transcript.push(ChatMessage::assistant(reply.clone()));
        reply
    }
}
