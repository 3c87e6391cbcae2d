//! Chat log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a rendered message, `msg-<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new() -> Self {
        Self(format!("msg-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Ready,
    /// Placeholder waiting for the completion answer
    Processing,
}

/// A message in the chat window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Names of the files sent with a user message
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<String>,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, attachments: Vec<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::User,
            text: text.into(),
            attachments,
            status: MessageStatus::Ready,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::Assistant,
            text: text.into(),
            attachments: Vec::new(),
            status: MessageStatus::Ready,
            created_at: Utc::now(),
        }
    }

    /// Assistant message shown while the answer is pending
    pub fn placeholder() -> Self {
        Self {
            status: MessageStatus::Processing,
            ..Self::assistant(super::render::PROCESSING_TEXT)
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == MessageStatus::Processing
    }
}

/// Visible message log. Entries are appended and updated, never removed
/// or reordered.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Replace a placeholder's content with the final answer.
    /// Returns the updated message, or `None` for an unknown id.
    pub fn resolve(&mut self, id: &MessageId, answer: &str) -> Option<ChatMessage> {
        let message = self.messages.iter_mut().find(|m| &m.id == id)?;
        message.text = answer.to_string();
        message.status = MessageStatus::Ready;
        Some(message.clone())
    }

    pub fn get(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
