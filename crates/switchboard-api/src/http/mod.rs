//! HTTP/REST API layer for Switchboard.
//!
//! Axum-based API with JSON bodies, `{"detail": ...}` errors, optional
//! bearer-token protection of conversation routes, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
