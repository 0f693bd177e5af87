//! Infrastructure layer for Switchboard.
//!
//! Contains implementations of the ports defined in `switchboard-core`:
//! SQLite user storage, Argon2 password hashing, JWT tokens, the
//! OpenAI-compatible LLM client, Pollinations image generation, lopdf text
//! extraction, and the web search and encyclopedia tools.

pub mod config;
pub mod crypto;
pub mod image_gen;
pub mod llm;
pub mod pdf;
pub mod sqlite;
pub mod token;
pub mod tools;
