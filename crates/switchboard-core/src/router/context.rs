//! Short history summary handed to the route classifier.

use switchboard_types::llm::MessageRole;
use switchboard_types::message::Message;

/// How many messages before the latest one the classifier sees.
pub const CONTEXT_MESSAGES: usize = 3;

/// Per-message character cap in the summary.
pub const CONTEXT_CHARS: usize = 100;

pub const NO_PREVIOUS_MESSAGES: &str = "No previous messages";

/// Summarize up to [`CONTEXT_MESSAGES`] messages preceding the last one.
///
/// `history` includes the current message as its final element; it is
/// excluded from the summary.
pub fn recent_context(history: &[Message]) -> String {
    let Some((_, earlier)) = history.split_last() else {
        return NO_PREVIOUS_MESSAGES.to_string();
    };
    if earlier.is_empty() {
        return NO_PREVIOUS_MESSAGES.to_string();
    }

    let start = earlier.len().saturating_sub(CONTEXT_MESSAGES);
    earlier[start..]
        .iter()
        .map(|message| {
            let label = match message.role {
                MessageRole::User => "User",
                MessageRole::Assistant => "Assistant",
                MessageRole::System => "System",
                MessageRole::Tool => "Tool",
            };
            format!("{label}: {}", truncate_chars(&message.content.transcript(), CONTEXT_CHARS))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
