//! Thread history endpoints.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use switchboard_types::conversation::ThreadId;
use switchboard_types::llm::MessageRole;
use switchboard_types::message::{ContentPart, Message, MessageContent};
use switchboard_types::route::Route;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub thread_id: String,
    pub messages: Vec<MessageView>,
    pub image_url: Option<String>,
    pub generated_image_url: Option<String>,
    pub image_prompt: Option<String>,
}

/// A stored message as returned to clients. PDF parts show only their filename.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: MessageRole,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            role: message.role,
            content: content_view(&message.content),
            created_at: message.created_at,
            route: message.route,
        }
    }
}

fn content_view(content: &MessageContent) -> Value {
    match content {
        MessageContent::Text(text) => Value::String(text.clone()),
        MessageContent::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({"type": "text", "text": text}),
                    ContentPart::ImageUrl { image_url } => {
                        json!({"type": "image_url", "image_url": image_url})
                    }
                    ContentPart::Pdf { filename, .. } => {
                        json!({"type": "pdf", "filename": filename})
                    }
                })
                .collect(),
        ),
    }
}

/// GET /threads/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ThreadResponse>, AppError> {
    let thread = state.engine.thread(&ThreadId::new(id)).await?;
    Ok(Json(ThreadResponse {
        thread_id: thread.thread_id.to_string(),
        messages: thread.messages.iter().map(MessageView::from).collect(),
        image_url: thread.image_url,
        generated_image_url: thread.generated_image_url,
        image_prompt: thread.image_prompt,
    }))
}

/// DELETE /threads/{id}
pub async fn delete_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.engine.delete_thread(&ThreadId::new(id)).await?;
    Ok(Json(json!({"deleted": true})))
}
