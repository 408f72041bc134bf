//! CampusBuddy Event Portal
//!
//! Core data and workflow layer for a campus event management portal.
//! This library provides modular components for account identity, the
//! college/event catalog, registration and payment processing, engagement
//! analytics and user-generated content with review tracking.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusBuddyError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use session::{SessionStore, SessionToken};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
