//! Conversation Messages
//!
//! Standard message format used across the loan agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Conversation history with utility methods
///
/// Append-only during a session, with one exception: while a reply is
/// streaming, the trailing assistant message is extended in place via
/// [`Conversation::append_delta`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Extend the trailing assistant message with a streamed text delta.
    ///
    /// Creates the assistant message on the first delta of a reply, so a
    /// stream that yields no content never leaves an empty message behind.
    pub fn append_delta(&mut self, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.push_str(delta);
                last.timestamp = Utc::now();
            }
            _ => self.messages.push(Message::assistant(delta)),
        }
    }

    /// Content of the trailing assistant message, if any
    pub fn last_assistant_text(&self) -> Option<&str> {
        match self.messages.last() {
            Some(m) if m.role == Role::Assistant => Some(&m.content),
            _ => None,
        }
    }

    /// Clear all messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_append_delta_creates_assistant_message() {
        let mut conv = Conversation::new();
        conv.push(Message::user("Hi"));

        conv.append_delta("Hel");
        conv.append_delta("lo!");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.last_assistant_text(), Some("Hello!"));
    }

    #[test]
    fn test_append_delta_extends_in_place() {
        let mut conv = Conversation::new();
        conv.push(Message::assistant("Wel"));
        conv.append_delta("come");

        assert_eq!(conv.len(), 1);
        assert_eq!(conv.last().unwrap().content, "Welcome");
    }

    #[test]
    fn test_no_delta_no_message() {
        let mut conv = Conversation::new();
        conv.push(Message::user("Hi"));
        assert_eq!(conv.last_assistant_text(), None);
        assert_eq!(conv.len(), 1);
    }
}
