//! Assistant abstractions and the message format shared by every provider.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Text sent on behalf of the user when a session opens.
pub const GREETING_TRIGGER: &str = "Hello";

/// Shown in place of a reply when the assistant cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting to my services right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Role::User => "user",
                Role::Assistant => "assistant",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An opaque text-in, text-out conversational service.
///
/// Implementations may keep their own conversation history.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// Appends the financial context block to the user's text.
pub fn compose_message(text: &str, context: &str) -> String {
    format!("{text}\n\nHere is my current financial context:\n{context}")
}
