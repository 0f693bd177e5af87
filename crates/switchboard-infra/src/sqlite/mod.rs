//! SQLite storage layer.
//!
//! User records backed by SQLite with WAL mode and split read/write pools.

pub mod pool;
pub mod user;
