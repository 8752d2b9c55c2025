//! Conversation sessions
//!
//! An [`AgentSession`] owns the transcript and drives one turn at a time:
//!
//! ```text
//! user text ─▶ transcript ─▶ ChatBackend ─▶ reply ─▶ ActionDispatcher ─▶ transcript
//! ```
//!
//! Backend failures come back as an `Error: …` string instead of an
//! assistant message, so the conversation always continues.

mod agent_loop;
mod types;

pub use agent_loop::AgentSession;
pub use types::{SessionConfig, SessionId};
