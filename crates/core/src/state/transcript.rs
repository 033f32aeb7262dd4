//! # Transcript
//!
//! Ordered, append-only conversation record owned by a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::Assistant, content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Entry `n` positions from the end (0 = last)
    pub fn from_end(&self, n: usize) -> Option<&Message> {
        self.messages.len().checked_sub(n + 1).map(|i| &self.messages[i])
    }

    /// Prompt context: the whole history followed by the message being answered.
    ///
    /// An empty transcript yields the bare message.
    pub fn context_for(&self, current_message: &str) -> String {
        if self.messages.is_empty() {
            return current_message.to_string();
        }

        let mut context = String::from("Conversation History:\n");
        for message in &self.messages {
            context.push_str(message.role.as_str());
            context.push_str(": ");
            context.push_str(&message.content);
            context.push('\n');
        }
        context.push_str("\nCurrent user message: ");
        context.push_str(current_message);
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_end() {
        let mut transcript = Transcript::new();
        assert!(transcript.from_end(0).is_none());

        transcript.push_user("hi");
        transcript.push_assistant("hello");
        transcript.push_user("research widgets");

        assert_eq!(transcript.from_end(0).unwrap().content, "research widgets");
        assert_eq!(transcript.from_end(1).unwrap().role, Role::Assistant);
        assert!(transcript.from_end(3).is_none());
    }

    #[test]
    fn test_context_for_empty_transcript_is_bare_message() {
        assert_eq!(Transcript::new().context_for("hello"), "hello");
    }

    #[test]
    fn test_context_lists_roles_in_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("I want a dashboard");
        transcript.push_assistant("Tell me more");

        let context = transcript.context_for("It is for ops teams");
        assert!(context.starts_with("Conversation History:\nuser: I want a dashboard\nassistant: Tell me more\n"));
        assert!(context.ends_with("Current user message: It is for ops teams"));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        let json = serde_json::to_value(&transcript).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
    }
}
