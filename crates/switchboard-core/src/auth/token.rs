//! TokenIssuer trait for stateless bearer tokens.

use switchboard_types::error::AuthError;
use switchboard_types::user::{AccessToken, TokenClaims};

/// Issues and verifies signed, expiring access tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token whose subject is `subject`.
    fn issue(&self, subject: &str) -> Result<AccessToken, AuthError>;

    /// Verify signature and expiry. Any failure is `AuthError::InvalidToken`.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
