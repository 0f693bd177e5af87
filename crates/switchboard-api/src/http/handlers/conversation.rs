//! Conversation endpoints: chat, vision, PDF, and image generation.
//!
//! Each endpoint builds one user message and runs a turn through the
//! engine. The classifier still routes the turn; attachments force vision
//! or pdf regardless of what it says.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};

use switchboard_core::engine::TurnOutcome;
use switchboard_core::handler::TurnOptions;
use switchboard_core::image::ImageOverrides;
use switchboard_types::message::{ContentPart, Message, MessageContent};

use crate::http::error::AppError;
use crate::http::extractors::body::{AppJson, AppQuery};
use crate::state::AppState;

/// Query text sent with an upload that carries none.
const DEFAULT_PDF_QUERY: &str = "Summarize the PDF.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisionRequest {
    #[serde(default)]
    pub question: String,
    pub image_url: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Fields that may also arrive as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct TurnQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub response: String,
    pub thread_id: String,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub response: String,
    pub generated_image_url: Option<String>,
    pub thread_id: String,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            response: outcome.reply.content.text(),
            thread_id: outcome.thread_id.to_string(),
        }
    }
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    AppJson(body): AppJson<ChatRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let outcome = state
        .engine
        .run_turn(
            body.thread_id.as_deref(),
            Message::user(body.message),
            TurnOptions::default(),
        )
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /vision
pub async fn vision(
    State(state): State<AppState>,
    AppJson(body): AppJson<VisionRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let mut parts = Vec::with_capacity(2);
    if !body.question.trim().is_empty() {
        parts.push(ContentPart::Text {
            text: body.question,
        });
    }
    parts.push(ContentPart::ImageUrl {
        image_url: body.image_url,
    });

    let outcome = state
        .engine
        .run_turn(
            body.thread_id.as_deref(),
            Message::user(MessageContent::Parts(parts)),
            TurnOptions::default(),
        )
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /pdf (multipart: `file`, optional `query` and `thread_id`)
///
/// `query` and `thread_id` are also accepted as query parameters; form
/// fields win when both are present.
pub async fn pdf(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TurnQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TurnResponse>, AppError> {
    let mut multipart = multipart?;
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut query = params.query;
    let mut thread_id = params.thread_id;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
                file = Some((bytes.to_vec(), filename));
            }
            Some(key @ ("query" | "thread_id")) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid field '{key}': {e}")))?;
                if key == "query" {
                    query = Some(value);
                } else {
                    thread_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((data, filename)) = file else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };
    let query = query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PDF_QUERY.to_string());

    tracing::debug!(bytes = data.len(), filename = ?filename, "pdf upload received");

    let message = Message::user(MessageContent::Parts(vec![
        ContentPart::Pdf { data, filename },
        ContentPart::Text { text: query },
    ]));
    let outcome = state
        .engine
        .run_turn(thread_id.as_deref(), message, TurnOptions::default())
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /generate-image
///
/// `thread_id` may come from the body or the query string.
pub async fn generate_image(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TurnQuery>,
    AppJson(body): AppJson<GenerateImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let options = TurnOptions {
        image: ImageOverrides {
            width: body.width,
            height: body.height,
            seed: body.seed,
            model: body.model,
        },
    };
    let thread_id = body.thread_id.or(params.thread_id);
    let message = Message::user(MessageContent::Parts(vec![ContentPart::Text {
        text: format!("generate image: {}", body.prompt),
    }]));

    let outcome = state
        .engine
        .run_turn(thread_id.as_deref(), message, options)
        .await?;

    Ok(Json(ImageResponse {
        response: outcome.reply.content.text(),
        generated_image_url: outcome.generated_image_url,
        thread_id: outcome.thread_id.to_string(),
    }))
}
