//! Conversation message types.
//!
//! A message body is either plain text or an ordered list of typed parts
//! (text, image reference, PDF payload). PDF bytes travel as base64 in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::MessageRole;
use crate::route::Route;

/// One typed part of a structured message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    ImageUrl {
        image_url: String,
    },
    Pdf {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
}

/// Body of a message: plain text or structured parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Text fragments of the body, joined with single spaces.
    ///
    /// Image and PDF parts contribute nothing.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// The first text part, or the whole body when it is plain text.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text.as_str()),
            MessageContent::Parts(parts) => parts.iter().find_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// URL of the first image part, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.parts().iter().find_map(|part| match part {
            ContentPart::ImageUrl { image_url } => Some(image_url.as_str()),
            _ => None,
        })
    }

    /// Bytes of the first PDF part, if any.
    pub fn pdf(&self) -> Option<&[u8]> {
        self.parts().iter().find_map(|part| match part {
            ContentPart::Pdf { data, .. } => Some(data.as_slice()),
            _ => None,
        })
    }

    /// Drop PDF payloads, keeping the part and its filename as a marker.
    pub fn release_pdf_bytes(&mut self) {
        if let MessageContent::Parts(parts) = self {
            for part in parts {
                if let ContentPart::Pdf { data, .. } = part {
                    *data = Vec::new();
                }
            }
        }
    }

    /// Text rendering suitable for a text-only model.
    ///
    /// Attachments are replaced with short bracketed markers so prior turns
    /// stay legible without shipping binary payloads again.
    pub fn transcript(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => text.clone(),
                    ContentPart::ImageUrl { image_url } => format!("[image: {image_url}]"),
                    ContentPart::Pdf { .. } => "[PDF attachment]".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    fn parts(&self) -> &[ContentPart] {
        match self {
            MessageContent::Text(_) => &[],
            MessageContent::Parts(parts) => parts,
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A single message in a conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
    /// Handler that produced this message (assistant/system replies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            route: None,
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Tag the message with the handler that produced it.
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vision_parts() -> MessageContent {
        MessageContent::Parts(vec![
            ContentPart::Text {
                text: "What is this?".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: "https://example.com/cat.png".to_string(),
            },
        ])
    }

    #[test]
    fn test_plain_text_content_deserializes_from_string() {
        let content: MessageContent = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(content, MessageContent::Text("hello".to_string()));
    }

    #[test]
    fn test_parts_wire_shape() {
        let json = serde_json::to_value(vision_parts()).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[0]["text"], "What is this?");
        assert_eq!(json[1]["type"], "image_url");
        assert_eq!(json[1]["image_url"], "https://example.com/cat.png");
    }

    #[test]
    fn test_pdf_part_is_base64_on_the_wire() {
        let content = MessageContent::Parts(vec![ContentPart::Pdf {
            data: b"%PDF-1.4".to_vec(),
            filename: None,
        }]);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json[0]["type"], "pdf");
        assert_eq!(json[0]["data"], "JVBERi0xLjQ=");
        assert!(json[0].get("filename").is_none());

        let parsed: MessageContent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.pdf(), Some(b"%PDF-1.4".as_slice()));
    }

    #[test]
    fn test_text_joins_text_parts_only() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "first".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: "https://example.com/a.png".to_string(),
            },
            ContentPart::Text {
                text: "second".to_string(),
            },
        ]);
        assert_eq!(content.text(), "first second");
        assert_eq!(content.first_text(), Some("first"));
    }

    #[test]
    fn test_attachment_accessors() {
        let content = vision_parts();
        assert_eq!(content.image_url(), Some("https://example.com/cat.png"));
        assert!(content.pdf().is_none());

        let plain = MessageContent::from("just text");
        assert!(plain.image_url().is_none());
        assert!(plain.pdf().is_none());
    }

    #[test]
    fn test_transcript_marks_attachments() {
        let content = MessageContent::Parts(vec![
            ContentPart::Pdf {
                data: vec![1, 2, 3],
                filename: Some("report.pdf".to_string()),
            },
            ContentPart::Text {
                text: "Summarize".to_string(),
            },
        ]);
        assert_eq!(content.transcript(), "[PDF attachment] Summarize");
        assert_eq!(
            vision_parts().transcript(),
            "What is this? [image: https://example.com/cat.png]"
        );
    }

    #[test]
    fn test_message_constructors() {
        let msg = Message::assistant("hi").with_route(Route::Chat);
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.route, Some(Route::Chat));
        assert_eq!(msg.content.text(), "hi");

        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("route").is_none());
    }
}
