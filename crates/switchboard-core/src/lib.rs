//! Business logic and port definitions for Switchboard.
//!
//! This crate holds the request-routing state machine (router, handlers,
//! turn engine), the in-memory conversation store, and the auth service.
//! It defines the "ports" (provider, classifier, tool, repository traits)
//! that switchboard-infra implements and never depends on any network or
//! database crate itself.

pub mod auth;
pub mod conversation;
pub mod engine;
pub mod handler;
pub mod image;
pub mod llm;
pub mod pdf;
pub mod router;
pub mod tool;
