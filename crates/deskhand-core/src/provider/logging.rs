//! Backend request/response logging
//!
//! Set the `LLM_LOG_FILE` environment variable to append one JSON line per
//! backend round-trip.
//!
//! Example: `LLM_LOG_FILE=/tmp/llm.log deskhand`

use serde_json::json;
use std::io::Write;
use tracing::{debug, warn};

use crate::orchestration::ChatMessage;

/// What to include in a log entry
#[derive(Default)]
pub struct LogConfig<'a> {
    /// The model used for this request
    pub model: &'a str,
    /// Messages in the request
    pub messages: &'a [ChatMessage],
    /// Assistant reply text
    pub reply: Option<&'a str>,
    /// Error message if the request failed
    pub error: Option<&'a str>,
}

/// Build the JSON entry for one interaction
pub(crate) fn log_entry(config: &LogConfig<'_>) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = config
        .messages
        .iter()
        .map(|msg| json!({ "role": msg.role.as_str(), "content": msg.content }))
        .collect();

    json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model": config.model,
        "request": {
            "messages": messages,
            "message_count": config.messages.len(),
        },
        "response": config.reply,
        "error": config.error,
    })
}

/// Append the interaction to `LLM_LOG_FILE`, if set
pub fn log_llm_interaction(config: LogConfig<'_>) {
    let Ok(log_file) = std::env::var("LLM_LOG_FILE") else {
        return;
    };

    let entry = log_entry(&config);

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", entry) {
                warn!("Failed to write to LLM log file: {}", e);
                return;
            }
        }
        Err(e) => {
            warn!("Failed to open LLM log file {}: {}", log_file, e);
            return;
        }
    }

    debug!("Logged LLM interaction to {}", log_file);
}
