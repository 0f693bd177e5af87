//! Shared domain types for Switchboard.
//!
//! This crate contains the core domain types used across the Switchboard
//! service: messages, conversation state, routes, users and tokens, LLM
//! request/response shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, schemars, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod message;
pub mod route;
pub mod user;
