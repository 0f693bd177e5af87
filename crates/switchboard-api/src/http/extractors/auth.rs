//! Bearer token authentication extractor.
//!
//! Extracts the JWT from `Authorization: Bearer <token>` and verifies it
//! against the auth service. Verification is stateless: signature and
//! expiry only.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use switchboard_types::user::TokenClaims;

use crate::http::error::AppError;
use crate::state::AppState;

/// Verified claims of the caller. Extracting this validates the token.
pub struct Authenticated {
    pub claims: TokenClaims,
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let claims = state.auth.authenticate(&token)?;
        Ok(Authenticated { claims, token })
    }
}

/// Extract the bearer token from the `Authorization` header.
pub fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    let token = value
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extracts_bearer_token_case_insensitively() {
        assert_eq!(extract_bearer(&parts_with(Some("Bearer abc.def"))).unwrap(), "abc.def");
        assert_eq!(extract_bearer(&parts_with(Some("bearer  xyz "))).unwrap(), "xyz");
    }

    #[test]
    fn test_rejects_missing_or_foreign_scheme() {
        assert!(matches!(
            extract_bearer(&parts_with(None)),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            extract_bearer(&parts_with(Some("Basic dXNlcjpwdw=="))),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            extract_bearer(&parts_with(Some("Bearer "))),
            Err(AppError::Unauthorized(_))
        ));
    }
}
