//! Bearer token issuance.

pub mod jwt;
