//! Local inference server backend (Ollama chat API)

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::orchestration::ChatMessage;

use super::{log_llm_interaction, ChatBackend, LogConfig};

/// Client for `POST {base_url}/api/chat`
#[derive(Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

impl OllamaBackend {
    /// Create a backend from the `[backend]` configuration section
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request body for a transcript
    pub fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|msg| json!({ "role": msg.role.as_str(), "content": msg.content }))
            .collect();

        json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "top_p": self.top_p,
            }
        })
    }

    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        let endpoint = format!("{}/api/chat", self.base_url);
        debug!(%endpoint, model = %self.model, messages = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&endpoint)
            .json(&self.request_body(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat request failed");
            return Err(Error::Backend(format!(
                "Failed to get chat response (status code {})",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;
        parse_chat_response(body)
    }
}

/// Extract the assistant reply from a chat response body.
///
/// A body with an `error` field is a backend error; a body without
/// `message.content` is an empty reply.
pub fn parse_chat_response(body: Value) -> Result<String> {
    if let Some(error) = body.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(Error::Backend(message));
    }

    Ok(body
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let result = self.send(messages).await;

        let error = result.as_ref().err().map(ToString::to_string);
        log_llm_interaction(LogConfig {
            model: &self.model,
            messages,
            reply: result.as_ref().ok().map(String::as_str),
            error: error.as_deref(),
        });

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> OllamaBackend {
        OllamaBackend::new(&BackendConfig {
            base_url: "http://localhost:11434/".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_reply() {
        let body = json!({
            "model": "llama3",
            "message": {"role": "assistant", "content": "Hi there"},
            "done": true
        });
        assert_eq!(parse_chat_response(body).unwrap(), "Hi there");
    }

    #[test]
    fn test_parse_error_field() {
        let err = parse_chat_response(json!({"error": "model 'nope' not found"})).unwrap_err();
        assert!(matches!(err, Error::Backend(ref m) if m == "model 'nope' not found"));
    }

    #[test]
    fn test_parse_missing_content_is_empty() {
        assert_eq!(parse_chat_response(json!({"done": true})).unwrap(), "");
    }

    #[test]
    fn test_request_body_shape() {
        let backend = backend();
        assert_eq!(backend.base_url(), "http://localhost:11434");

        let body = backend.request_body(&[ChatMessage::system("sys"), ChatMessage::user("hello")]);
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hello"}));
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["options"]["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }
}
