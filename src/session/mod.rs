//! Session management module
//!
//! This module handles login sessions for users and admins

pub mod store;

// Re-export commonly used session components
pub use store::{SessionExpiry, SessionKind, SessionStore, SessionToken};
