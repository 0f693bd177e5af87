//! Attachment detection on the latest user message.

use switchboard_types::message::{ContentPart, MessageContent};

pub const IMAGE_MARKER: &str = "[IMAGE_ATTACHED]";
pub const PDF_MARKER: &str = "[PDF_ATTACHED]";

/// Classifier-facing rendering of a message plus the attachments it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedMessage {
    /// Text parts and attachment markers, in order, joined with spaces.
    pub text: String,
    pub has_image: bool,
    pub has_pdf: bool,
}

pub fn scan_attachments(content: &MessageContent) -> ScannedMessage {
    let parts = match content {
        MessageContent::Text(text) => {
            return ScannedMessage {
                text: text.clone(),
                ..Default::default()
            };
        }
        MessageContent::Parts(parts) => parts,
    };

    let mut scanned = ScannedMessage::default();
    let mut pieces = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            ContentPart::Text { text } => pieces.push(text.as_str()),
            ContentPart::ImageUrl { .. } => {
                pieces.push(IMAGE_MARKER);
                scanned.has_image = true;
            }
            ContentPart::Pdf { .. } => {
                pieces.push(PDF_MARKER);
                scanned.has_pdf = true;
            }
        }
    }
    scanned.text = pieces.join(" ");
    scanned
}
