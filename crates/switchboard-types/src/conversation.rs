//! Per-thread conversation state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// Identifier scoping one persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-sortable identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Use the caller's id verbatim when present and non-blank, otherwise
    /// generate one.
    pub fn resolve(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => Self::new(id),
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything remembered about one thread across turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub thread_id: ThreadId,
    /// Ordered message history, oldest first.
    pub messages: Vec<Message>,
    /// Last image reference supplied by the user in this thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Last successfully generated image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
    /// Prompt that produced `generated_image_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(thread_id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            thread_id,
            messages: Vec::new(),
            image_url: None,
            generated_image_url: None,
            image_prompt: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message, remembering any image reference it carries.
    pub fn push(&mut self, message: Message) {
        if let Some(url) = message.content.image_url() {
            self.image_url = Some(url.to_string());
        }
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Drop PDF bytes from every stored message. Each turn reads its own
    /// upload, so history only needs the marker.
    pub fn release_attachments(&mut self) {
        for message in &mut self.messages {
            message.content.release_pdf_bytes();
        }
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
