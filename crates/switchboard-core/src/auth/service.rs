//! Signup, login, and token verification.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use switchboard_types::error::{AuthError, RepositoryError};
use switchboard_types::user::{
    AccessToken, SignupInput, TokenClaims, User, is_valid_email, normalize_email,
};

use super::hasher::PasswordHasher;
use super::repository::UserRepository;
use super::token::TokenIssuer;

/// Service orchestrating account creation and authentication.
///
/// Generic over the repository, hasher, and token issuer so switchboard-core
/// never depends on switchboard-infra.
pub struct AuthService<R: UserRepository, H: PasswordHasher + 'static, T: TokenIssuer> {
    users: R,
    hasher: Arc<H>,
    tokens: T,
}

impl<R: UserRepository, H: PasswordHasher + 'static, T: TokenIssuer> AuthService<R, H, T> {
    pub fn new(users: R, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher: Arc::new(hasher),
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Checks run in a fixed order: email shape, duplicate email, password
    /// confirmation, then empty fields.
    pub async fn signup(&self, input: SignupInput) -> Result<User, AuthError> {
        let email = normalize_email(&input.email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidInput("invalid email address".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        if input.password != input.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username cannot be empty".to_string()));
        }
        if input.password.is_empty() {
            return Err(AuthError::InvalidInput("password cannot be empty".to_string()));
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailAlreadyRegistered,
            other => AuthError::Repository(other),
        })?;
        info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// Exchange credentials for an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            return Err(AuthError::IncorrectPassword);
        }

        let token = self.tokens.issue(&user.email)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Verify a bearer token and return its claims.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.verify(token)
    }

    /// The account a bearer token belongs to.
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.authenticate(token)?;
        self.users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("token subject no longer exists".to_string()))
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUsers {
        async fn create(&self, user: &User) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(RepositoryError::Conflict("email".to_string()));
            }
            users.push(user.clone());
            Ok(user.clone())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    /// Reversible "hash" that is enough to exercise the service.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain${password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("plain${password}"))
        }
    }

    struct EchoTokens;

    impl TokenIssuer for EchoTokens {
        fn issue(&self, subject: &str) -> Result<AccessToken, AuthError> {
            Ok(AccessToken {
                access_token: format!("token-for:{subject}"),
                token_type: AccessToken::BEARER.to_string(),
                expires_at: Utc::now(),
            })
        }

        fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
            token
                .strip_prefix("token-for:")
                .map(|sub| TokenClaims {
                    sub: sub.to_string(),
                    iat: 0,
                    exp: i64::MAX,
                })
                .ok_or_else(|| AuthError::InvalidToken("bad token".to_string()))
        }
    }

    type Service = AuthService<MemoryUsers, PlainHasher, EchoTokens>;

    fn service() -> Service {
        AuthService::new(MemoryUsers::default(), PlainHasher, EchoTokens)
    }

    fn signup_input(email: &str, password: &str, confirm: &str) -> SignupInput {
        SignupInput {
            username: "alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_normalizes_and_hashes() {
        let svc = service();
        let user = svc
            .signup(signup_input(" Alice@Example.com ", "s3cret", "s3cret"))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.password_hash, "plain$s3cret");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_without_second_record() {
        let svc = service();
        svc.signup(signup_input("a@b.com", "pw", "pw")).await.unwrap();
        let err = svc
            .signup(signup_input("A@B.com", "other", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyRegistered));
        assert_eq!(svc.users.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_checked_before_mismatch() {
        let svc = service();
        svc.signup(signup_input("a@b.com", "pw", "pw")).await.unwrap();
        let err = svc
            .signup(signup_input("a@b.com", "x", "y"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let err = service()
            .signup(signup_input("a@b.com", "one", "two"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }

    #[tokio::test]
    async fn test_invalid_inputs() {
        let svc = service();
        let bad_email = svc.signup(signup_input("nope", "pw", "pw")).await.unwrap_err();
        assert!(matches!(bad_email, AuthError::InvalidInput(_)));

        let empty_pw = svc.signup(signup_input("a@b.com", "", "")).await.unwrap_err();
        assert!(matches!(empty_pw, AuthError::InvalidInput(_)));

        let mut blank_name = signup_input("c@d.com", "pw", "pw");
        blank_name.username = "  ".to_string();
        assert!(matches!(
            svc.signup(blank_name).await.unwrap_err(),
            AuthError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_login_flow() {
        let svc = service();
        svc.signup(signup_input("a@b.com", "pw", "pw")).await.unwrap();

        let token = svc.login("A@b.com", "pw").await.unwrap();
        assert_eq!(token.token_type, "bearer");
        let claims = svc.authenticate(&token.access_token).unwrap();
        assert_eq!(claims.sub, "a@b.com");

        let me = svc.current_user(&token.access_token).await.unwrap();
        assert_eq!(me.username, "alice");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let svc = service();
        svc.signup(signup_input("a@b.com", "pw", "pw")).await.unwrap();

        assert!(matches!(
            svc.login("x@y.com", "pw").await.unwrap_err(),
            AuthError::UserNotFound
        ));
        assert!(matches!(
            svc.login("a@b.com", "wrong").await.unwrap_err(),
            AuthError::IncorrectPassword
        ));
    }

    #[tokio::test]
    async fn test_current_user_rejects_bad_token() {
        let svc = service();
        assert!(matches!(
            svc.current_user("garbage").await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));
        // Valid signature but no such account.
        assert!(matches!(
            svc.current_user("token-for:ghost@b.com").await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }
}
