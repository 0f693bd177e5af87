//! PasswordHasher trait for one-way credential hashing.
//!
//! The Argon2 adapter lives in switchboard-infra.

use switchboard_types::error::AuthError;

/// Salted one-way password hashing.
///
/// Both operations are CPU-bound; `AuthService` runs them on a blocking thread.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string (e.g., PHC format).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check `password` against a stored hash. `Ok(false)` means mismatch.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
