//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod admin;
pub mod college;
pub mod event;
pub mod registration;
pub mod ugc;
pub mod analytics;

// Re-export repositories
pub use user::UserRepository;
pub use admin::AdminRepository;
pub use college::CollegeRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use ugc::UgcRepository;
pub use analytics::AnalyticsRepository;
