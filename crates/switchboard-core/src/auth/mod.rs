//! Username/password accounts and bearer tokens.

pub mod hasher;
pub mod repository;
pub mod service;
pub mod token;

pub use self::hasher::PasswordHasher;
pub use self::repository::UserRepository;
pub use self::service::AuthService;
pub use self::token::TokenIssuer;
