//! Cryptographic operations for Switchboard.
//!
//! - `password`: Argon2id password hashing for user accounts

pub mod password;
