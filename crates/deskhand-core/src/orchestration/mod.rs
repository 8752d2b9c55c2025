//! Orchestration module for the conversational action loop
//!
//! This module contains:
//! - System prompts (base prompt plus the advertised action list)
//! - Chat message types
//! - The dispatch loop that executes actions embedded in replies

mod dispatch;
mod message;
mod system_prompt;

pub use dispatch::{
    format_action_result, resolve_request, ActionDispatcher, ActionRequest, ACTION_TYPE_KEY,
};
pub use message::{ChatMessage, Role};
pub use system_prompt::{SystemPrompt, DEFAULT_SYSTEM_PROMPT};
