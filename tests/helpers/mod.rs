//! Test helpers for integration tests
//!
//! Provides a Postgres-backed test database, a test context that wires the
//! portal services against it, and fake-data builders for request payloads.

pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
