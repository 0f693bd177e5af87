//! Account endpoints: signup, login, and current user.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use switchboard_types::user::SignupInput;

use crate::http::error::AppError;
use crate::http::extractors::body::AppJson;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub username: String,
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    AppJson(body): AppJson<SignupInput>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.signup(body).await?;
    Ok(Json(MessageResponse {
        message: "User created successfully".to_string(),
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        access_token: token.access_token,
        token_type: token.token_type,
        message: "Login successful".to_string(),
    }))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<MeResponse>, AppError> {
    tracing::debug!(user = %auth.claims.sub, "current user lookup");
    let user = state.auth.current_user(&auth.token).await?;
    Ok(Json(MeResponse {
        email: user.email,
        username: user.username,
    }))
}
