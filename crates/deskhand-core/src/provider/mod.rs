//! Chat backends
//!
//! The session only needs "send the transcript, get one assistant reply".
//! [`OllamaBackend`] talks to a local inference server; [`ScriptedBackend`]
//! replays canned replies for tests and offline use.

mod logging;
mod ollama;

pub use logging::{log_llm_interaction, LogConfig};
pub use ollama::{parse_chat_response, OllamaBackend};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::orchestration::ChatMessage;

/// A model backend that turns a transcript into one assistant reply
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Send the transcript and return the assistant's reply text
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Backend that replays queued replies in order.
///
/// `Err` entries surface as backend errors. Every transcript it receives is
/// recorded for inspection.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a backend failure
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    fn push(&self, entry: std::result::Result<String, String>) {
        self.replies.lock().push_back(entry);
    }

    /// Transcripts received so far, one per call
    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.received.lock().push(messages.to_vec());

        match self.replies.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::Backend(message)),
            None => Err(Error::Backend("no scripted reply left".into())),
        }
    }
}
