//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{"detail": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use switchboard_types::error::{AuthError, EngineError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Engine(EngineError),
    /// Missing or malformed bearer credentials.
    Unauthorized(String),
    /// Malformed request (missing upload, bad multipart field).
    BadRequest(String),
    /// An extractor refused the request; keeps its status.
    Rejected { status: StatusCode, detail: String },
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(
                AuthError::EmailAlreadyRegistered
                | AuthError::PasswordMismatch
                | AuthError::InvalidInput(_)
                | AuthError::IncorrectPassword,
            ) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::UserNotFound) => StatusCode::NOT_FOUND,
            AppError::Auth(AuthError::InvalidToken(_)) | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Engine(EngineError::ThreadNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Auth(_) | AppError::Engine(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Auth(e) => e.to_string(),
            AppError::Engine(e) => e.to_string(),
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
            AppError::Rejected { detail, .. } => detail.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %detail, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %detail, "request rejected");
        }

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
